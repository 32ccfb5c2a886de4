use dnstrace_domain::dns_name;
use dnstrace_domain::DomainError;

const MAX_LABEL_LEN: usize = 63;
const MAX_NAME_LEN: usize = 255;
const MAX_CHARACTER_STRING_LEN: usize = 255;

fn malformed(reason: impl Into<String>) -> DomainError {
    DomainError::MalformedMessage(reason.into())
}

/// Growable big-endian output buffer. Names are always written uncompressed.
pub struct WireWriter {
    buf: Vec<u8>,
}

impl WireWriter {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn write_u16(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Overwrites two bytes previously reserved at `at`.
    pub fn patch_u16(&mut self, at: usize, value: u16) -> Result<(), DomainError> {
        let slot = self
            .buf
            .get_mut(at..at + 2)
            .ok_or_else(|| malformed(format!("no reserved u16 at offset {}", at)))?;
        slot.copy_from_slice(&value.to_be_bytes());
        Ok(())
    }

    pub fn write_character_string(&mut self, value: &str) -> Result<(), DomainError> {
        let bytes = value.as_bytes();
        if bytes.len() > MAX_CHARACTER_STRING_LEN {
            return Err(malformed(format!(
                "character-string of {} bytes exceeds {}",
                bytes.len(),
                MAX_CHARACTER_STRING_LEN
            )));
        }
        self.write_u8(bytes.len() as u8);
        self.write_bytes(bytes);
        Ok(())
    }

    pub fn write_name(&mut self, name: &str) -> Result<(), DomainError> {
        let mut encoded_len = 1usize;
        for label in dns_name::labels(name) {
            let bytes = label.as_bytes();
            if bytes.len() > MAX_LABEL_LEN {
                return Err(malformed(format!(
                    "label '{}' is {} bytes, limit is {}",
                    label,
                    bytes.len(),
                    MAX_LABEL_LEN
                )));
            }
            encoded_len += bytes.len() + 1;
            if encoded_len > MAX_NAME_LEN {
                return Err(malformed(format!(
                    "name '{}' exceeds {} bytes",
                    name, MAX_NAME_LEN
                )));
            }
            self.write_u8(bytes.len() as u8);
            self.write_bytes(bytes);
        }
        self.write_u8(0);
        Ok(())
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}
