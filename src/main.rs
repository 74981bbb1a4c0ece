// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

// CLI entrypoint for decoyc.

fn main() {
    match decoyc::compiler::run() {
        Ok(summary) => {
            let stdout = std::io::stdout();
            let _ = decoyc::compiler::report(stdout.lock(), &summary);
        }
        Err(err) => {
            eprintln!("\nCompilation Failed!\nError: {err}");
            std::process::exit(1);
        }
    }
}
