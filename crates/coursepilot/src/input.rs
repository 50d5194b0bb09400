use coursepilot_core::model::TransportEvent;

/// One line of interactive input.
#[derive(Clone, Debug, PartialEq)]
pub enum Input {
    /// A transport event typed or piped in as JSON.
    Event(TransportEvent),
    /// `toggle <toolCallId> <row>`
    Toggle {
        /// Call id of the course result.
        tool_call_id: String,
        /// Row index as shown in the `#` column.
        row: usize,
    },
    /// `quit`
    Quit,
}

/// Failure to understand a line of input.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    /// The line looked like JSON but is not a transport event.
    #[error("invalid event: {0}")]
    InvalidEvent(#[source] serde_json::Error),
    /// `toggle` with missing or malformed arguments.
    #[error("usage: toggle <toolCallId> <row>")]
    ToggleUsage,
    /// Anything else.
    #[error("unknown command \"{0}\", expected toggle, clear or quit")]
    UnknownCommand(String),
}

/// Parses one line of input. Blank lines yield `None`.
pub fn parse_input(line: &str) -> Result<Option<Input>, InputError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    if line.starts_with('{') {
        let event = serde_json::from_str(line).map_err(InputError::InvalidEvent)?;
        return Ok(Some(Input::Event(event)));
    }

    let mut words = line.split_whitespace();
    let input = match words.next().unwrap_or_default() {
        "quit" | "exit" => Input::Quit,
        "clear" => Input::Event(TransportEvent::Clear),
        "toggle" => {
            let (Some(tool_call_id), Some(row), None) =
                (words.next(), words.next(), words.next())
            else {
                return Err(InputError::ToggleUsage);
            };
            let row = row.parse().map_err(|_| InputError::ToggleUsage)?;
            Input::Toggle {
                tool_call_id: tool_call_id.to_owned(),
                row,
            }
        }
        other => return Err(InputError::UnknownCommand(other.to_owned())),
    };
    Ok(Some(input))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commands() {
        assert_eq!(parse_input("  ").unwrap(), None);
        assert_eq!(parse_input("quit\n").unwrap(), Some(Input::Quit));
        assert_eq!(
            parse_input("clear").unwrap(),
            Some(Input::Event(TransportEvent::Clear))
        );
        assert_eq!(
            parse_input("toggle call_1 2").unwrap(),
            Some(Input::Toggle {
                tool_call_id: "call_1".to_owned(),
                row: 2,
            })
        );
        assert_eq!(
            parse_input(r#"{"type":"loading","data":true}"#).unwrap(),
            Some(Input::Event(TransportEvent::Loading(true)))
        );
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            parse_input("toggle call_1"),
            Err(InputError::ToggleUsage)
        ));
        assert!(matches!(
            parse_input("toggle call_1 -1"),
            Err(InputError::ToggleUsage)
        ));
        assert!(matches!(
            parse_input("toggle call_1 1 2"),
            Err(InputError::ToggleUsage)
        ));
        assert!(matches!(
            parse_input("{\"type\":1}"),
            Err(InputError::InvalidEvent(_))
        ));
        assert_eq!(
            parse_input("help").unwrap_err().to_string(),
            "unknown command \"help\", expected toggle, clear or quit"
        );
    }
}
