//! Tests for placeholder scanning and rendering

use super::*;
