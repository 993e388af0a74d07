//! Terminal prompts and output styling
//!
//! Simple stdin-driven selection and confirmation. These are thin I/O
//! wrappers; every policy decision they produce is passed explicitly into
//! the core operations.

use colored::Colorize;
use std::collections::BTreeSet;
use std::io::{self, BufRead, Write};

use crate::agents::{available_agents, Agent};
use crate::manifest::ManifestGuideline;

/// Ask a yes/no question, defaulting to no
pub fn confirm(question: &str) -> bool {
    print!("{} [y/N]: ", question);
    let _ = io::stdout().flush();

    let mut response = String::new();
    if io::stdin().lock().read_line(&mut response).is_err() {
        return false;
    }
    let response = response.trim().to_lowercase();
    response == "y" || response == "yes"
}

/// Interactive multi-select over guideline entries.
///
/// The user enters a comma/space separated list of numbers, `all`, or
/// nothing. An empty selection is a valid outcome meaning "none".
pub fn select_guidelines(available: &[ManifestGuideline]) -> io::Result<Vec<ManifestGuideline>> {
    if available.is_empty() {
        return Ok(Vec::new());
    }

    println!("\nAvailable guidelines:");
    for (i, g) in available.iter().enumerate() {
        println!("  {}. {} - {}", i + 1, g.name.bold(), g.description);
    }
    print!("\nSelect guidelines (numbers, 'all', or empty for none): ");
    let _ = io::stdout().flush();

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let line = line.trim();

    if line.is_empty() {
        return Ok(Vec::new());
    }
    if line.eq_ignore_ascii_case("all") {
        return Ok(available.to_vec());
    }

    let mut picked: BTreeSet<usize> = BTreeSet::new();
    for token in line.split(|c: char| c == ',' || c.is_whitespace()) {
        if token.is_empty() {
            continue;
        }
        match token.parse::<usize>() {
            Ok(n) if (1..=available.len()).contains(&n) => {
                picked.insert(n - 1);
            }
            _ => {
                println!("{} Ignoring invalid selection '{}'", "!".yellow(), token);
            }
        }
    }

    Ok(picked.into_iter().map(|i| available[i].clone()).collect())
}

/// Select guidelines by name, validating that every requested name exists.
pub fn select_guidelines_by_name(
    available: &[ManifestGuideline],
    names: &[String],
) -> Result<Vec<ManifestGuideline>, String> {
    if names.is_empty() {
        return Err("no guideline names provided".to_string());
    }

    let mut selected = Vec::new();
    let mut missing = Vec::new();

    for name in names {
        match available.iter().find(|g| &g.name == name) {
            Some(g) => selected.push(g.clone()),
            None => missing.push(name.clone()),
        }
    }

    if !missing.is_empty() {
        let available_names: Vec<&str> = available.iter().map(|g| g.name.as_str()).collect();
        return Err(format!(
            "guidelines not found: {} (available: {})",
            missing.join(", "),
            available_names.join(", ")
        ));
    }

    Ok(selected)
}

/// Interactive multi-select over the supported agents. Previously selected
/// agents are shown as the default and kept when the user just hits enter.
pub fn select_agents(previous: &[String]) -> io::Result<Vec<String>> {
    let agents: &[Agent] = available_agents();

    println!("\nSupported agents:");
    for (i, agent) in agents.iter().enumerate() {
        let marker = if previous.iter().any(|p| p == agent.id) {
            "*"
        } else {
            " "
        };
        println!(
            "  {}. [{}] {} - {}",
            i + 1,
            marker,
            agent.display_name.bold(),
            agent.description
        );
    }
    print!("\nSelect agents (numbers, 'all', or empty to keep current): ");
    let _ = io::stdout().flush();

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let line = line.trim();

    if line.is_empty() {
        return Ok(previous.to_vec());
    }
    if line.eq_ignore_ascii_case("all") {
        return Ok(agents.iter().map(|a| a.id.to_string()).collect());
    }

    let mut picked: BTreeSet<usize> = BTreeSet::new();
    for token in line.split(|c: char| c == ',' || c.is_whitespace()) {
        if token.is_empty() {
            continue;
        }
        if let Ok(n) = token.parse::<usize>() {
            if (1..=agents.len()).contains(&n) {
                picked.insert(n - 1);
            }
        }
    }

    Ok(picked.into_iter().map(|i| agents[i].id.to_string()).collect())
}

/// Success marker for status lines
pub fn success(msg: &str) -> colored::ColoredString {
    mark("✓", msg).green()
}

/// Error marker for status lines
pub fn error(msg: &str) -> colored::ColoredString {
    mark("✗", msg).red()
}

/// Warning marker for status lines
pub fn warning(msg: &str) -> colored::ColoredString {
    mark("⚠", msg).yellow()
}

fn mark(symbol: &str, msg: &str) -> String {
    if msg.is_empty() {
        symbol.to_string()
    } else {
        format!("{} {}", symbol, msg)
    }
}
