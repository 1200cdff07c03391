//! Console output helpers.
//!
//! Plain ANSI styling; all user-facing text goes through these so the
//! pipeline and engines stay free of formatting concerns.

pub fn display_error(message: &str) {
    eprintln!("\x1b[31mERROR:\x1b[0m {}", message); // Red color
}

pub fn display_success(message: &str) {
    println!("\x1b[32m✓\x1b[0m {}", message); // Green color
}

pub fn display_status(message: &str) {
    println!("\x1b[33m→\x1b[0m {}", message); // Yellow color
}

pub fn display_warning(message: &str) {
    eprintln!("\x1b[33mWARNING:\x1b[0m {}", message);
}

pub fn display_header(title: &str) {
    println!("\n\x1b[1m{}\x1b[0m", title);
    println!("{}", "=".repeat(title.chars().count()));
}

/// Show the release PR about to be created: title, base, labels, body.
pub fn display_proposed_pr(title: &str, target_branch: &str, labels: &[String], body: &str) {
    println!("\n\x1b[1mProposed release PR:\x1b[0m");
    println!("  Title: {}", title);
    println!("  Base:  {}", target_branch);
    if !labels.is_empty() {
        println!("  Labels: {}", labels.join(", "));
    }
    println!("\n{}", body);
}

/// Show how the next version was determined.
pub fn display_version_decision(latest_tag: &str, version: &str, origin: &str) {
    println!("\n\x1b[1mVersion:\x1b[0m");
    println!("  From: \x1b[31m{}\x1b[0m", latest_tag);
    println!("  To:   \x1b[32m{}\x1b[0m ({})", version, origin);
}
