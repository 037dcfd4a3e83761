//! Database integration tests.

use super::*;
use crate::error::AppError;
use crate::models::*;
use crate::test_support::{create_note, create_notebook, create_tag, setup_temp_db};
