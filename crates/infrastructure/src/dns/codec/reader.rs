use dnstrace_domain::DomainError;

/// Longest encoded name RFC 1035 allows, length octets included.
const MAX_NAME_LEN: usize = 255;

/// Pointers followed while reading a single name before giving up.
const MAX_POINTER_JUMPS: usize = 64;

fn malformed(reason: impl Into<String>) -> DomainError {
    DomainError::MalformedMessage(reason.into())
}

/// Bounds-checked big-endian cursor over a received message.
pub struct WireReader<'a> {
    buf: &'a [u8],
    pos: usize,
    /// Offsets to return to after following compression pointers.
    positions: Vec<usize>,
}

impl<'a> WireReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            pos: 0,
            positions: Vec::new(),
        }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn seek(&mut self, pos: usize) -> Result<(), DomainError> {
        if pos > self.buf.len() {
            return Err(malformed(format!(
                "seek to offset {} past end of {}-byte message",
                pos,
                self.buf.len()
            )));
        }
        self.pos = pos;
        Ok(())
    }

    pub fn read_bytes(&mut self, n: usize, what: &str) -> Result<&'a [u8], DomainError> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|end| *end <= self.buf.len())
            .ok_or_else(|| {
                malformed(format!(
                    "{} at offset {} needs {} bytes, only {} remain",
                    what,
                    self.pos,
                    n,
                    self.buf.len().saturating_sub(self.pos)
                ))
            })?;
        let bytes = &self.buf[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    pub fn read_u8(&mut self, what: &str) -> Result<u8, DomainError> {
        Ok(self.read_bytes(1, what)?[0])
    }

    pub fn read_u16(&mut self, what: &str) -> Result<u16, DomainError> {
        let b = self.read_bytes(2, what)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    pub fn read_u32(&mut self, what: &str) -> Result<u32, DomainError> {
        let b = self.read_bytes(4, what)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// One length-prefixed `<character-string>`.
    pub fn read_character_string(&mut self) -> Result<String, DomainError> {
        let len = self.read_u8("character-string length")? as usize;
        let bytes = self.read_bytes(len, "character-string")?;
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }

    /// Reads a possibly compressed name and returns it fully qualified.
    ///
    /// A pointer must refer to an offset before the byte holding it. Jumps and
    /// total name length are both bounded, so crafted pointer chains fail
    /// instead of looping.
    pub fn read_name(&mut self) -> Result<String, DomainError> {
        let mut labels: Vec<String> = Vec::new();
        let mut encoded_len = 1usize;
        let mut jumps = 0usize;
        let base_depth = self.positions.len();

        let result = loop {
            let label_start = self.pos;
            let len = match self.read_u8("label length") {
                Ok(len) => len,
                Err(e) => break Err(e),
            };

            match len & 0xC0 {
                0x00 if len == 0 => break Ok(()),
                0x00 => {
                    encoded_len += len as usize + 1;
                    if encoded_len > MAX_NAME_LEN {
                        break Err(malformed(format!(
                            "name at offset {} exceeds {} bytes",
                            label_start, MAX_NAME_LEN
                        )));
                    }
                    match self.read_bytes(len as usize, "label") {
                        Ok(bytes) => labels.push(String::from_utf8_lossy(bytes).into_owned()),
                        Err(e) => break Err(e),
                    }
                }
                0xC0 => {
                    let low = match self.read_u8("compression pointer") {
                        Ok(low) => low,
                        Err(e) => break Err(e),
                    };
                    let target = (((len & 0x3F) as usize) << 8) | low as usize;
                    if target >= label_start {
                        break Err(malformed(format!(
                            "compression pointer at offset {} targets {}, which is not earlier",
                            label_start, target
                        )));
                    }
                    jumps += 1;
                    if jumps > MAX_POINTER_JUMPS {
                        break Err(malformed(format!(
                            "name at offset {} follows more than {} pointers",
                            label_start, MAX_POINTER_JUMPS
                        )));
                    }
                    if self.positions.len() == base_depth {
                        self.positions.push(self.pos);
                    }
                    self.pos = target;
                }
                _ => {
                    break Err(malformed(format!(
                        "unsupported label type 0x{:02x} at offset {}",
                        len & 0xC0,
                        label_start
                    )))
                }
            }
        };

        if self.positions.len() > base_depth {
            if let Some(resume) = self.positions.pop() {
                self.pos = resume;
            }
        }
        result?;

        if labels.is_empty() {
            Ok(".".to_string())
        } else {
            Ok(format!("{}.", labels.join(".")))
        }
    }
}
