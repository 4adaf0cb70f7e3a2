//! Parsing of cashier keystrokes into commands. Line indices are 1-based at
//! the prompt and bounds-checked before they ever reach the cart engine.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PosCommand {
    /// List the menu, optionally filtered by a search term.
    Menu(Option<String>),
    /// Add the first menu entry matching the search term.
    Add(String),
    Increment(usize),
    Decrement(usize),
    /// Raw quantity text for a line; settles immediately (entering the value
    /// is the blur).
    QuantityText(usize, String),
    NoteOpen(usize),
    NoteSet(usize, String),
    NoteClose(usize),
    Remove(usize),
    Clear,
    Show,
    Checkout,
    Stats(Option<String>),
    Help,
    Quit,
}

pub fn parse(line: &str) -> Result<PosCommand, String> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    match verb {
        "menu" => Ok(PosCommand::Menu(opt_text(rest))),
        "add" => {
            if rest.is_empty() {
                Err("usage: add <search term>".into())
            } else {
                Ok(PosCommand::Add(rest.to_string()))
            }
        }
        "+" => index_arg(rest, "+ <line>").map(PosCommand::Increment),
        "-" => index_arg(rest, "- <line>").map(PosCommand::Decrement),
        "qty" => {
            let (index, text) = match rest.split_once(char::is_whitespace) {
                Some((index, text)) => (index, text.trim()),
                None => (rest, ""),
            };
            let index = index_arg(index, "qty <line> [value]")?;
            Ok(PosCommand::QuantityText(index, text.to_string()))
        }
        "note" => {
            let (index, text) = match rest.split_once(char::is_whitespace) {
                Some((index, text)) => (index, text.trim()),
                None => (rest, ""),
            };
            let index = index_arg(index, "note <line> [text]")?;
            if text.is_empty() {
                Ok(PosCommand::NoteOpen(index))
            } else {
                Ok(PosCommand::NoteSet(index, text.to_string()))
            }
        }
        "nonote" => index_arg(rest, "nonote <line>").map(PosCommand::NoteClose),
        "rm" => index_arg(rest, "rm <line>").map(PosCommand::Remove),
        "clear" => Ok(PosCommand::Clear),
        "show" => Ok(PosCommand::Show),
        "checkout" | "print" => Ok(PosCommand::Checkout),
        "stats" => Ok(PosCommand::Stats(opt_text(rest))),
        "help" | "?" => Ok(PosCommand::Help),
        "quit" | "exit" => Ok(PosCommand::Quit),
        "" => Err("type `help` for commands".into()),
        other => Err(format!("unknown command `{other}`; type `help`")),
    }
}

fn opt_text(rest: &str) -> Option<String> {
    if rest.is_empty() {
        None
    } else {
        Some(rest.to_string())
    }
}

fn index_arg(rest: &str, usage: &str) -> Result<usize, String> {
    rest.parse::<usize>()
        .ok()
        .filter(|&n| n >= 1)
        .ok_or_else(|| format!("usage: {usage}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_add_with_multi_word_term() {
        assert_eq!(
            parse("add chè sầu"),
            Ok(PosCommand::Add("chè sầu".to_string()))
        );
    }

    #[test]
    fn parses_quantity_with_and_without_value() {
        assert_eq!(
            parse("qty 2 5"),
            Ok(PosCommand::QuantityText(2, "5".to_string()))
        );
        // Clearing the field: no value at all.
        assert_eq!(
            parse("qty 2"),
            Ok(PosCommand::QuantityText(2, String::new()))
        );
    }

    #[test]
    fn note_without_text_opens_the_editor() {
        assert_eq!(parse("note 1"), Ok(PosCommand::NoteOpen(1)));
        assert_eq!(
            parse("note 1 ít ngọt, nhiều đá"),
            Ok(PosCommand::NoteSet(1, "ít ngọt, nhiều đá".to_string()))
        );
        assert_eq!(parse("nonote 1"), Ok(PosCommand::NoteClose(1)));
    }

    #[test]
    fn rejects_zero_and_garbage_indices() {
        assert!(parse("+ 0").is_err());
        assert!(parse("rm x").is_err());
        assert!(parse("- ").is_err());
    }

    #[test]
    fn stats_takes_an_optional_date() {
        assert_eq!(parse("stats"), Ok(PosCommand::Stats(None)));
        assert_eq!(
            parse("stats 2025-01-03"),
            Ok(PosCommand::Stats(Some("2025-01-03".to_string())))
        );
    }

    #[test]
    fn unknown_and_empty_input_report_usage() {
        assert!(parse("").is_err());
        assert!(parse("frobnicate").is_err());
    }
}
