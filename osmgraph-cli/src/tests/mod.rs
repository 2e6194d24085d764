//! Shared test harness modules for the osmgraph CLI.

use super::*;

mod helpers;
