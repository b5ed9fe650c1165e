use colored::{ColoredString, Colorize};
use flows_core::{Confirmation, EntityStatus, Verdict, classify};
use flows_provider::{Diagnostics, Severity};

/// Status word colored by what it means for a confirmation
pub fn status(status: &EntityStatus) -> ColoredString {
    let word = status.as_str();
    match classify(status) {
        Verdict::Ready => word.green().bold(),
        Verdict::Transitional => word.yellow(),
        Verdict::TerminalFailure => word.red().bold(),
        Verdict::Unknown => word.magenta(),
    }
}

pub fn print_status(label: &str, id: &str, value: &EntityStatus) {
    println!("{} {}: {}", label, id.cyan(), status(value));
}

pub fn print_confirmation(label: &str, id: &str, confirmation: &Confirmation) {
    if confirmation.confirm_issued {
        println!("{} {} {}", "✓".green(), label, "confirmed".green());
    } else {
        println!(
            "{} {} was not a draft ({}), nothing to confirm",
            label,
            id.cyan(),
            status(&confirmation.initial_status)
        );
    }

    if confirmation.waited {
        println!("{} {}: {}", label, id.cyan(), status(&confirmation.status));
    }
}

/// Print diagnostics to stderr; errors in red, warnings in yellow.
pub fn print_diagnostics(diagnostics: &Diagnostics) {
    for diagnostic in diagnostics.iter() {
        match diagnostic.severity {
            Severity::Error => eprintln!(
                "{} {}",
                "Error:".red().bold(),
                diagnostic.to_string().red()
            ),
            Severity::Warning => eprintln!(
                "{} {}",
                "Warning:".yellow().bold(),
                diagnostic.to_string().yellow()
            ),
        }
    }
}

/// Print diagnostics and turn errors into a failed command.
pub fn finish(diagnostics: &Diagnostics, what: &str) -> anyhow::Result<()> {
    print_diagnostics(diagnostics);
    if diagnostics.has_error() {
        anyhow::bail!("{} failed", what);
    }
    Ok(())
}
