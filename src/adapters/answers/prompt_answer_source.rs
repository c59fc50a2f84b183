//! Terminal prompt answer source.
//!
//! Renders each question with a hint derived from its type, reads one line
//! per answer, and maps convenience inputs (enum labels, `COUNT:TYPE` for
//! collections, empty input for defaults) onto the raw answer format.

use async_trait::async_trait;
use serde_json::Value;
use tokio::io::{
    self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Stdin, Stdout,
};
use tokio::sync::Mutex;

use crate::domain::resolver::{Answer, DateRange, QuestionSpec, TypeInfo};
use crate::ports::{AnswerError, AnswerRequest, AnswerSource};

struct PromptIo<R, W> {
    reader: R,
    writer: W,
}

/// Answer source that prompts on a writer and reads lines from a reader.
pub struct PromptAnswerSource<R, W> {
    io: Mutex<PromptIo<R, W>>,
}

impl PromptAnswerSource<BufReader<Stdin>, Stdout> {
    /// Prompts on stdout and reads from stdin.
    pub fn stdio() -> Self {
        Self::new(BufReader::new(io::stdin()), io::stdout())
    }
}

impl<R, W> PromptAnswerSource<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    /// Creates a prompt over arbitrary streams.
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            io: Mutex::new(PromptIo { reader, writer }),
        }
    }

    /// Returns the underlying reader and writer.
    pub fn into_parts(self) -> (R, W) {
        let io = self.io.into_inner();
        (io.reader, io.writer)
    }
}

#[async_trait]
impl<R, W> AnswerSource for PromptAnswerSource<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn answer(&self, request: &AnswerRequest) -> Result<Answer, AnswerError> {
        let mut io = self.io.lock().await;
        let io = &mut *io;

        io.writer
            .write_all(render_prompt(request).as_bytes())
            .await
            .map_err(|e| AnswerError::Io(e.to_string()))?;
        io.writer
            .flush()
            .await
            .map_err(|e| AnswerError::Io(e.to_string()))?;

        let mut line = String::new();
        let read = io
            .reader
            .read_line(&mut line)
            .await
            .map_err(|e| AnswerError::Io(e.to_string()))?;
        if read == 0 {
            return Err(AnswerError::Closed);
        }

        Ok(parse_reply(&request.question, &line))
    }
}

/// Renders the prompt text for a request, ending with `": "`.
pub fn render_prompt(request: &AnswerRequest) -> String {
    let question = &request.question;
    let mut prompt = String::new();

    if let Some(error) = &request.previous_error {
        prompt.push_str(&format!("  ! {}\n", error));
    }
    if let Some(info) = question.info.as_deref().filter(|info| !info.is_empty()) {
        prompt.push_str(&format!("  {}\n", info));
    }

    prompt.push_str(&question.text);
    if let Some(hint) = type_hint(&question.type_info) {
        prompt.push_str(&format!(" ({})", hint));
    }
    if let Some(default) = &question.default_value {
        prompt.push_str(&format!(" [default: {}]", display_value(default)));
    }
    prompt.push_str(": ");
    prompt
}

fn type_hint(type_info: &TypeInfo) -> Option<String> {
    match type_info {
        TypeInfo::BooleanType => Some("y/n".to_string()),
        TypeInfo::EnumType { possible_values } => Some(
            possible_values
                .iter()
                .map(|pair| {
                    if pair.v == pair.label {
                        pair.v.clone()
                    } else {
                        format!("{} = {}", pair.v, pair.label)
                    }
                })
                .collect::<Vec<_>>()
                .join(" | "),
        ),
        TypeInfo::NumberType { range: Some(range) } => {
            let bounds = match (&range.min, &range.max) {
                (Some(min), Some(max)) => Some(format!("{}..{}", min, max)),
                (Some(min), None) => Some(format!(">= {}", min)),
                (None, Some(max)) => Some(format!("<= {}", max)),
                (None, None) => None,
            };
            match (bounds, &range.step) {
                (Some(bounds), Some(step)) => Some(format!("{}, step {}", bounds, step)),
                (Some(bounds), None) => Some(bounds),
                (None, Some(step)) => Some(format!("step {}", step)),
                (None, None) => None,
            }
        }
        TypeInfo::TextType { regex: Some(regex), .. } => Some(format!("format {}", regex)),
        TypeInfo::DateType { range } => Some(date_hint("YYYY-MM-DD", range.as_ref())),
        TypeInfo::DateTimeType { range } => {
            Some(date_hint("YYYY-MM-DDTHH:MM:SS", range.as_ref()))
        }
        TypeInfo::ObjectCollectionType {
            min_size,
            max_size,
            possible_types,
        } => {
            let mut hint = format!("number of elements, {}", size_bounds(*min_size, *max_size));
            if possible_types.len() > 1 {
                let names: Vec<&str> = possible_types.iter().map(|t| t.label.as_str()).collect();
                hint.push_str(&format!("; answer COUNT:TYPE with TYPE one of {}", names.join(", ")));
            }
            Some(hint)
        }
        TypeInfo::SimpleCollectionType {
            min_size,
            max_size,
            element_type,
        } => Some(format!(
            "number of {} elements, {}",
            element_type,
            size_bounds(*min_size, *max_size)
        )),
        _ => None,
    }
}

fn date_hint(format: &str, range: Option<&DateRange>) -> String {
    match range.map(|r| (r.min.as_deref(), r.max.as_deref())) {
        Some((Some(min), Some(max))) => format!("{}, {}..{}", format, min, max),
        Some((Some(min), None)) => format!("{}, from {}", format, min),
        Some((None, Some(max))) => format!("{}, until {}", format, max),
        _ => format.to_string(),
    }
}

fn size_bounds(min: u64, max: Option<u64>) -> String {
    match max {
        Some(max) => format!("{}..{}", min, max),
        None => format!("at least {}", min),
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Maps a typed line onto an answer for the question.
pub fn parse_reply(question: &QuestionSpec, line: &str) -> Answer {
    let reply = line.trim();

    if reply.is_empty() {
        if let Some(default) = &question.default_value {
            return Answer::new(display_value(default));
        }
    }

    match &question.type_info {
        TypeInfo::EnumType { possible_values } => possible_values
            .iter()
            .find(|pair| pair.v == reply)
            .or_else(|| {
                possible_values
                    .iter()
                    .find(|pair| pair.label.eq_ignore_ascii_case(reply))
            })
            .map(|pair| Answer::new(pair.v.clone()))
            .unwrap_or_else(|| Answer::new(reply)),
        TypeInfo::ObjectCollectionType { .. } => match reply.split_once(':') {
            Some((count, element_type)) => {
                Answer::new(count.trim()).with_element_type(element_type.trim())
            }
            None => Answer::new(reply),
        },
        _ => Answer::new(reply),
    }
}
