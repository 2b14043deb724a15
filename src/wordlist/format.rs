use nom::character::complete::{space0, u64 as decimal};
use nom::combinator::all_consuming;
use nom::sequence::delimited;
use nom::IResult;
use typed_builder::TypedBuilder;

use crate::wordlist::error::FormatError;

/// Layout of a dictionary file.
///
/// Without a delimiter every whitespace-separated token is one occurrence of a
/// word. With a delimiter each line holds one word and its frequency in the
/// given columns.
#[derive(TypedBuilder, Debug, Clone)]
pub struct FileFormat {
    #[builder(default, setter(into))]
    delimiter: Option<char>,
    #[builder(default, setter(into))]
    word_column: Option<usize>,
    #[builder(default, setter(into))]
    freq_column: Option<usize>,
    /// Fail on words outside `a`-`z` instead of skipping them.
    #[builder(default)]
    strict: bool,
}

/// Whitespace as `scanf("%s")` sees it.
fn is_separator(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0B' | '\x0C')
}

fn frequency(input: &str) -> IResult<&str, u64> {
    all_consuming(delimited(space0, decimal, space0))(input)
}

impl FileFormat {
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub fn parse_line<'a>(&self, line: &'a str) -> Result<Vec<(&'a str, usize)>, FormatError> {
        match self.delimiter {
            None => Ok(line.split(is_separator)
                .filter(|x| !x.is_empty())
                .map(|x| (x, 1))
                .collect()),
            Some(delimiter) => {
                if line.trim().is_empty() {
                    return Ok(vec![]);
                }
                let columns = line.split(delimiter).collect::<Vec<_>>();
                let word_idx = self.word_column.unwrap_or(0);
                let freq_idx = self.freq_column.unwrap_or(1);

                let word = columns.get(word_idx)
                    .ok_or(FormatError::MissingColumn(word_idx))?
                    .trim();
                if word.is_empty() {
                    return Err(FormatError::EmptyWord);
                }
                let freq_text = columns.get(freq_idx)
                    .ok_or(FormatError::MissingColumn(freq_idx))?;
                let (_, freq) = frequency(freq_text)
                    .map_err(|_| FormatError::InvalidFrequency(freq_text.to_string()))?;
                let freq = usize::try_from(freq)
                    .map_err(|_| FormatError::InvalidFrequency(freq_text.to_string()))?;
                Ok(vec![(word, freq)])
            }
        }
    }
}
