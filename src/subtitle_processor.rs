use std::fmt;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{FormatError, SerializationError};

// @module: WebVTT parsing, batching and serialization

// @const: Cue timing line regex, `start --> end [settings]`
static TIMING_LINE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\S+)[ \t]+-->[ \t]+(\S+)(?:[ \t]+(.*\S))?[ \t]*$").unwrap()
});

// @const: Timestamp regex, hours optional per the WebVTT grammar
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(\d{2,}):)?([0-5]\d):([0-5]\d)\.(\d{3})$").unwrap()
});

/// A cue timestamp.
///
/// Keeps the exact source text next to the parsed millisecond value:
/// ordering checks use `millis`, serialization uses `raw`, so the textual
/// form round-trips byte-for-byte (zero-padding, optional hour field).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VttTimestamp {
    // @field: Timestamp exactly as written in the source
    pub raw: String,

    // @field: Offset from file start in ms
    pub millis: u64,
}

impl VttTimestamp {
    /// Parse a `HH:MM:SS.mmm` (or `MM:SS.mmm`) timestamp.
    pub fn parse(text: &str) -> Option<Self> {
        let caps = TIMESTAMP_REGEX.captures(text)?;

        let hours: u64 = caps.get(1).map_or(Ok(0), |m| m.as_str().parse()).ok()?;
        let minutes: u64 = caps[2].parse().ok()?;
        let seconds: u64 = caps[3].parse().ok()?;
        let millis: u64 = caps[4].parse().ok()?;

        Some(VttTimestamp {
            raw: text.to_string(),
            millis: hours * 3_600_000 + minutes * 60_000 + seconds * 1_000 + millis,
        })
    }

    /// Build a timestamp from a millisecond offset, in canonical `HH:MM:SS.mmm` form
    /// - used by tests and external consumers
    #[allow(dead_code)]
    pub fn from_millis(ms: u64) -> Self {
        let hours = ms / 3_600_000;
        let minutes = (ms % 3_600_000) / 60_000;
        let seconds = (ms % 60_000) / 1_000;
        let millis = ms % 1_000;

        VttTimestamp {
            raw: format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, seconds, millis),
            millis: ms,
        }
    }
}

impl fmt::Display for VttTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

// @struct: Single subtitle cue
#[derive(Debug, Clone, PartialEq)]
pub struct VttCue {
    // @field: Optional cue identifier line, never synthesized
    pub index: Option<String>,

    // @field: Start time
    pub start: VttTimestamp,

    // @field: End time
    pub end: VttTimestamp,

    // @field: Verbatim settings suffix of the timing line, if any
    pub settings: Option<String>,

    // @field: Cue text lines, in order
    pub text: Vec<String>,
}

impl VttCue {
    /// Cue text as a single block, lines joined with explicit breaks.
    pub fn joined_text(&self) -> String {
        self.text.join("\n")
    }

    /// Copy of this cue with the text replaced.
    ///
    /// Everything except `text` is carried over unchanged; the replacement
    /// block is split back into lines along its line breaks.
    pub fn with_text(&self, text: &str) -> VttCue {
        VttCue {
            index: self.index.clone(),
            start: self.start.clone(),
            end: self.end.clone(),
            settings: self.settings.clone(),
            text: text.split('\n').map(str::to_string).collect(),
        }
    }
}

impl fmt::Display for VttCue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(index) = &self.index {
            writeln!(f, "{}", index)?;
        }
        match &self.settings {
            Some(settings) => writeln!(f, "{} --> {} {}", self.start, self.end, settings)?,
            None => writeln!(f, "{} --> {}", self.start, self.end)?,
        }
        for line in &self.text {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// A parsed WebVTT document: verbatim header plus ordered cues
#[derive(Debug, Clone, PartialEq)]
pub struct VttDocument {
    /// The WEBVTT signature line and any header metadata lines, verbatim
    pub header: String,

    /// Ordered cue list
    pub cues: Vec<VttCue>,
}

impl VttDocument {
    /// Parse raw WebVTT content into a document.
    ///
    /// Single pass over the input; pure, no side effects. Any malformed cue
    /// block aborts the parse with an error naming the block.
    pub fn parse(content: &str) -> Result<VttDocument, FormatError> {
        // A UTF-8 BOM before the signature is allowed
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let lines: Vec<&str> = content.lines().collect();

        if !Self::is_signature(lines.first().copied().unwrap_or("")) {
            return Err(FormatError::MissingSignature);
        }

        // Header block: the signature line plus any metadata lines up to the
        // first blank line, preserved verbatim
        let mut pos = 0;
        let mut header_lines = Vec::new();
        while pos < lines.len() && !lines[pos].trim().is_empty() {
            header_lines.push(lines[pos]);
            pos += 1;
        }
        let header = header_lines.join("\n");

        // Remaining blocks, separated by blank lines, are cues
        let mut cues = Vec::new();
        let mut block_num = 0;
        while pos < lines.len() {
            while pos < lines.len() && lines[pos].trim().is_empty() {
                pos += 1;
            }
            if pos >= lines.len() {
                break;
            }

            let block_start = pos;
            while pos < lines.len() && !lines[pos].trim().is_empty() {
                pos += 1;
            }

            block_num += 1;
            cues.push(Self::parse_cue_block(&lines[block_start..pos], block_num)?);
        }

        Ok(VttDocument { header, cues })
    }

    /// Partition the cues' text into ordered groups of up to `batch_size` blocks.
    ///
    /// Each block is one cue's joined text. Pure partitioning: concatenating
    /// the groups in order reconstructs the original text list.
    pub fn batch_texts(&self, batch_size: usize) -> Vec<Vec<String>> {
        // Batch size is validated at configuration time; clamp as a backstop
        let size = batch_size.max(1);

        self.cues
            .chunks(size)
            .map(|chunk| chunk.iter().map(VttCue::joined_text).collect())
            .collect()
    }

    /// Derive a document with the cue text replaced by translations.
    ///
    /// `translated` must hold one text block per cue, in cue order. All
    /// non-text attributes are carried over from the originals.
    pub fn with_translations(&self, translated: &[String]) -> Result<VttDocument, SerializationError> {
        if translated.len() != self.cues.len() {
            return Err(SerializationError::CountMismatch {
                cues: self.cues.len(),
                translations: translated.len(),
            });
        }

        let cues = self
            .cues
            .iter()
            .zip(translated.iter())
            .map(|(cue, text)| cue.with_text(text))
            .collect();

        Ok(VttDocument {
            header: self.header.clone(),
            cues,
        })
    }

    /// Render the document back to WebVTT text.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.header.len() + self.cues.len() * 64);
        out.push_str(&self.header);
        out.push('\n');

        for cue in &self.cues {
            out.push('\n');
            out.push_str(&cue.to_string());
        }

        out
    }

    // @checks: WEBVTT signature line, trailing text allowed
    fn is_signature(line: &str) -> bool {
        line == "WEBVTT" || line.starts_with("WEBVTT ") || line.starts_with("WEBVTT\t")
    }

    // @parses: One blank-line-delimited block into a cue
    fn parse_cue_block(block: &[&str], block_num: usize) -> Result<VttCue, FormatError> {
        // A first line without an arrow is the cue identifier; timing follows
        let (index, rest) = if block[0].contains("-->") {
            (None, block)
        } else {
            (Some(block[0].to_string()), &block[1..])
        };

        let timing_line = rest.first().copied().unwrap_or("");
        let invalid_timing = || FormatError::InvalidTimingLine {
            block: block_num,
            line: timing_line.to_string(),
        };

        let caps = TIMING_LINE_REGEX.captures(timing_line).ok_or_else(invalid_timing)?;
        let start = VttTimestamp::parse(&caps[1]).ok_or_else(invalid_timing)?;
        let end = VttTimestamp::parse(&caps[2]).ok_or_else(invalid_timing)?;

        if start.millis >= end.millis {
            return Err(FormatError::InvalidTimeRange {
                block: block_num,
                start: start.raw,
                end: end.raw,
            });
        }

        let settings = caps.get(3).map(|m| m.as_str().to_string());

        let text: Vec<String> = rest[1..].iter().map(|line| line.to_string()).collect();
        if text.is_empty() {
            return Err(FormatError::MissingText { block: block_num });
        }

        Ok(VttCue {
            index,
            start,
            end,
            settings,
            text,
        })
    }
}

impl fmt::Display for VttDocument {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}
