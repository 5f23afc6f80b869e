//! Interactive analysis form.
//!
//! The default mode: prompt for title/author/category, show the analysis
//! and the usage summary, then loop for the next work. Fields are passed
//! through untouched: exact strings are what the cache keys on.

use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use metasurf::prompts::Category;

use super::common;

/// Run the interactive form loop.
pub(crate) async fn cmd_interactive() -> Result<()> {
    let session = common::build_session()?;

    println!("Metasurf");
    println!("The easiest way to know an artistic work");
    println!();
    let categories: Vec<&str> = Category::ALL.iter().map(|c| c.as_str()).collect();
    println!("Categories: {}", categories.join(", "));
    println!("Enter an empty title (or Ctrl-C) to quit.");
    println!();

    let mut rl = DefaultEditor::new()?;
    loop {
        let Some(title) = read_field(&mut rl, "Title: ") else {
            break;
        };
        if title.is_empty() {
            break;
        }
        let Some(author) = read_field(&mut rl, "Author: ") else {
            break;
        };
        let Some(category) = read_field(&mut rl, "Category: ") else {
            break;
        };

        println!("Analyzing... Please wait.");
        match session.submit(&title, &author, &category).await {
            Ok(analysis) => {
                common::print_analysis_guarded(&analysis);
                println!();
                common::print_stats(&session.analytics());
                println!();
            }
            Err(e) => {
                eprintln!("Error: {e}");
                println!();
            }
        }
        session.reset();
    }

    Ok(())
}

/// Read one form field; `None` means the user bailed out.
fn read_field(rl: &mut DefaultEditor, prompt: &str) -> Option<String> {
    match rl.readline(prompt) {
        Ok(line) => Some(line),
        Err(ReadlineError::Interrupted | ReadlineError::Eof) => None,
        Err(_) => None,
    }
}
