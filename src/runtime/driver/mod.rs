//! Terminal drivers that own a `ShellRuntime` and feed it user input.

pub mod cli;
