//! Library side of the `kaiso` binary: argument handling, payload records and
//! logging setup.

pub mod cli;
pub mod logging;
