use dns_relay_domain::DomainError;

/// Bounds-checked cursor over a complete DNS message.
///
/// Positions are absolute offsets from the start of the message, which is
/// what compression pointers address.
#[derive(Debug, Clone)]
pub struct WireReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> WireReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn at(buf: &'a [u8], pos: usize) -> Self {
        Self { buf, pos }
    }

    pub fn buffer(&self) -> &'a [u8] {
        self.buf
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.pos)
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub(crate) fn seek(&mut self, pos: usize) {
        self.pos = pos;
    }

    pub fn read_u8(&mut self) -> Result<u8, DomainError> {
        let [byte] = self.read_array::<1>()?;
        Ok(byte)
    }

    pub fn read_u16(&mut self) -> Result<u16, DomainError> {
        self.read_array::<2>().map(u16::from_be_bytes)
    }

    pub fn read_u32(&mut self) -> Result<u32, DomainError> {
        self.read_array::<4>().map(u32::from_be_bytes)
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], DomainError> {
        let end = self.pos.checked_add(len).filter(|end| *end <= self.buf.len());
        match end {
            Some(end) => {
                let bytes = &self.buf[self.pos..end];
                self.pos = end;
                Ok(bytes)
            }
            None => Err(DomainError::TruncatedInput {
                offset: self.pos,
                needed: len - self.remaining(),
            }),
        }
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], DomainError> {
        let bytes = self.read_bytes(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }
}
