use std::io::{self, BufRead, Lines};

/// Groups the lines of a reader into batches of at most `buffer_size`
/// stripped lines, in input order.
pub struct BufferedLines<I> {
    lines: I,
    buffer_size: usize,
}

impl<I> BufferedLines<I>
where
    I: Iterator<Item = io::Result<String>>,
{
    pub fn new(lines: I, buffer_size: usize) -> Self {
        Self {
            lines,
            buffer_size: buffer_size.max(1),
        }
    }

    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }
}

impl<I> Iterator for BufferedLines<I>
where
    I: Iterator<Item = io::Result<String>>,
{
    type Item = io::Result<Vec<String>>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut buffer = Vec::new();
        for line in self.lines.by_ref() {
            match line {
                Ok(line) => buffer.push(line.trim().to_string()),
                Err(e) => return Some(Err(e)),
            }
            if buffer.len() >= self.buffer_size {
                return Some(Ok(buffer));
            }
        }

        // Flush the final partial batch.
        if buffer.is_empty() {
            None
        } else {
            Some(Ok(buffer))
        }
    }
}

/// Reads `reader` lazily in batches of `buffer_size` lines.
///
/// ```
/// use laser_prep::buffered_read;
///
/// let text = "a\n b \nc\n".as_bytes();
/// let batches: Vec<_> = buffered_read(text, 2).map(Result::unwrap).collect();
/// assert_eq!(batches, vec![vec!["a", "b"], vec!["c"]]);
/// ```
pub fn buffered_read<R: BufRead>(reader: R, buffer_size: usize) -> BufferedLines<Lines<R>> {
    BufferedLines::new(reader.lines(), buffer_size)
}
