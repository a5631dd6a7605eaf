//! Status lines for the terminal. They go to stderr so that stdout carries
//! only command output (payloads, passwords, JSON).

use colored::*;

pub fn success(message: &str) {
    eprintln!("{} {}", "✓".green().bold(), message);
}

pub fn info(message: &str) {
    eprintln!("{} {}", "ℹ".blue().bold(), message);
}

pub fn warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow().bold(), message.yellow());
}

pub fn header(title: &str) {
    println!("{}", title.bold());
    println!("{}", "=".repeat(title.chars().count()));
}

pub fn field(label: &str, value: &str) {
    println!("{:<14} {}", format!("{}:", label).as_str().dimmed(), value);
}
