//! Output module for presenting addresses and checks
//!
//! This module renders plain-text reports for the command line:
//! - The address list with each address's latest check
//! - One address with its full check history

mod report;

pub use report::{render_address_list, render_check_history, render_check_outcome};
