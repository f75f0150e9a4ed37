//! Raw-mode keyboard input.
//!
//! Keys are decoded from raw stdin bytes by a small state machine.
//! Decoder state is kept across `read()` chunks: an escape sequence cut
//! short by the end of a chunk waits up to [`ESCAPE_TIMEOUT`] for the rest
//! of its bytes before it is reported as `Esc` or `Unknown`.

use std::collections::VecDeque;
use std::io::{self, IsTerminal, Read, StdinLock};
use std::time::Duration;

use crossterm::terminal::{disable_raw_mode, enable_raw_mode};

use crate::error::{AicommitError, Result};

/// How long an unfinished escape sequence waits for its remaining bytes.
pub const ESCAPE_TIMEOUT: Duration = Duration::from_millis(50);

const READ_BUF_SIZE: usize = 8 * 1024;

/// A decoded key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Enter,
    Space,
    Esc,
    /// Ctrl+C delivered as a literal byte (raw mode disables the signal).
    Interrupt,
    Char(char),
    Unknown,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum DecodeState {
    #[default]
    Idle,
    SawEscape,
    SawBracket,
}

/// Byte-level key decoder.
#[derive(Debug, Default)]
pub struct KeyDecoder {
    state: DecodeState,
}

impl KeyDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes the bytes of one read.
    ///
    /// An unfinished escape sequence at the end of `chunk` stays in the
    /// decoder and continues with the next chunk (see [`Self::flush`]).
    pub fn decode(&mut self, chunk: &[u8]) -> Vec<Key> {
        let mut keys = Vec::new();
        let mut i = 0;

        while i < chunk.len() {
            let byte = chunk[i];
            match self.state {
                DecodeState::Idle => {
                    if byte >= 0x80 {
                        let (key, used) = decode_utf8(&chunk[i..]);
                        keys.push(key);
                        i += used;
                        continue;
                    }
                    if let Some(key) = self.idle(byte) {
                        keys.push(key);
                    }
                }
                DecodeState::SawEscape => match byte {
                    b'[' | b'O' => self.state = DecodeState::SawBracket,
                    _ => {
                        // 单独的 ESC，后面的字节重新按普通按键处理
                        keys.push(Key::Esc);
                        self.state = DecodeState::Idle;
                        continue;
                    }
                },
                DecodeState::SawBracket => match byte {
                    // CSI 参数字节，例如 ESC [ 1 ; 5 A
                    0x30..=0x3f => {}
                    0x40..=0x7e => {
                        keys.push(match byte {
                            b'A' => Key::Up,
                            b'B' => Key::Down,
                            _ => Key::Unknown,
                        });
                        self.state = DecodeState::Idle;
                    }
                    _ => {
                        keys.push(Key::Unknown);
                        self.state = DecodeState::Idle;
                    }
                },
            }
            i += 1;
        }

        keys
    }

    /// True while an escape sequence is waiting for more bytes.
    pub fn is_pending(&self) -> bool {
        self.state != DecodeState::Idle
    }

    /// Ends an unfinished escape sequence once no more bytes are coming.
    ///
    /// A lone ESC becomes [`Key::Esc`], a cut-off CSI sequence [`Key::Unknown`].
    pub fn flush(&mut self) -> Option<Key> {
        let key = match self.state {
            DecodeState::Idle => None,
            DecodeState::SawEscape => Some(Key::Esc),
            DecodeState::SawBracket => Some(Key::Unknown),
        };
        self.state = DecodeState::Idle;
        key
    }

    fn idle(&mut self, byte: u8) -> Option<Key> {
        match byte {
            0x1b => {
                self.state = DecodeState::SawEscape;
                None
            }
            b'\r' | b'\n' => Some(Key::Enter),
            b' ' => Some(Key::Space),
            0x03 => Some(Key::Interrupt),
            0x21..=0x7e => Some(Key::Char(byte as char)),
            _ => Some(Key::Unknown),
        }
    }
}

/// Decodes one multi-byte UTF-8 character at the start of `bytes`.
fn decode_utf8(bytes: &[u8]) -> (Key, usize) {
    let len = match bytes[0] {
        0xc0..=0xdf => 2,
        0xe0..=0xef => 3,
        0xf0..=0xf7 => 4,
        _ => return (Key::Unknown, 1),
    };
    match bytes.get(..len).and_then(|b| std::str::from_utf8(b).ok()) {
        Some(s) => (s.chars().next().map_or(Key::Unknown, Key::Char), len),
        None => (Key::Unknown, 1),
    }
}

/// Source of key presses.
pub trait KeyReader {
    /// Blocks until the next key is available.
    fn read_key(&mut self) -> io::Result<Key>;
}

/// Waits up to the given duration for more input on `R`; `false` on timeout.
pub type InputWait<R> = fn(&R, Duration) -> io::Result<bool>;

/// Reads keys from a byte stream (stdin in raw mode).
pub struct ByteKeyReader<R> {
    input: R,
    decoder: KeyDecoder,
    pending: VecDeque<Key>,
    wait_for_input: InputWait<R>,
}

impl<R: Read> ByteKeyReader<R> {
    /// Reader over a plain stream: an unfinished sequence only ends at EOF.
    pub fn new(input: R) -> Self {
        Self::with_input_wait(input, |_, _| Ok(true))
    }

    pub fn with_input_wait(input: R, wait_for_input: InputWait<R>) -> Self {
        Self {
            input,
            decoder: KeyDecoder::new(),
            pending: VecDeque::new(),
            wait_for_input,
        }
    }
}

impl ByteKeyReader<StdinLock<'static>> {
    /// Reader over the locked process stdin.
    pub fn stdin() -> Self {
        Self::with_input_wait(io::stdin().lock(), stdin_ready)
    }
}

#[cfg(unix)]
fn stdin_ready(input: &StdinLock<'static>, timeout: Duration) -> io::Result<bool> {
    use nix::poll::{PollFd, PollFlags, PollTimeout, poll};
    use std::os::fd::AsFd;

    let millis = u16::try_from(timeout.as_millis()).unwrap_or(u16::MAX);
    let mut fds = [PollFd::new(input.as_fd(), PollFlags::POLLIN)];
    let ready = poll(&mut fds, PollTimeout::from(millis)).map_err(io::Error::from)?;
    Ok(ready > 0)
}

// 非 unix 平台没有可用的 fd poll，未完成的序列立即结束
#[cfg(not(unix))]
fn stdin_ready(_input: &StdinLock<'static>, _timeout: Duration) -> io::Result<bool> {
    Ok(false)
}

impl<R: Read> KeyReader for ByteKeyReader<R> {
    fn read_key(&mut self) -> io::Result<Key> {
        loop {
            if let Some(key) = self.pending.pop_front() {
                return Ok(key);
            }

            if self.decoder.is_pending()
                && !(self.wait_for_input)(&self.input, ESCAPE_TIMEOUT)?
            {
                self.pending.extend(self.decoder.flush());
                continue;
            }

            // 不小于 stdin 内部缓冲区，读取绕过缓冲，剩余字节留在 fd 上供 poll 检查
            let mut buf = [0u8; READ_BUF_SIZE];
            let n = self.input.read(&mut buf)?;
            if n == 0 {
                if let Some(key) = self.decoder.flush() {
                    return Ok(key);
                }
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "input closed",
                ));
            }
            self.pending.extend(self.decoder.decode(&buf[..n]));
        }
    }
}

/// Raw terminal mode held for the guard's lifetime.
///
/// Dropping the guard restores the previous mode, including during unwinding.
pub struct RawModeGuard {
    _private: (),
}

impl RawModeGuard {
    /// Enters raw mode.
    ///
    /// # Errors
    /// [`AicommitError::NoTty`] when stdin is not a terminal or the mode
    /// cannot be changed.
    pub fn acquire() -> Result<Self> {
        if !io::stdin().is_terminal() {
            return Err(AicommitError::NoTty);
        }
        enable_raw_mode().map_err(|e| {
            tracing::debug!("Failed to enable raw mode: {}", e);
            AicommitError::NoTty
        })?;
        Ok(Self { _private: () })
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if let Err(e) = disable_raw_mode() {
            tracing::warn!("Failed to restore terminal mode: {}", e);
        }
    }
}

/// Leaves raw mode unconditionally (used by the panic hook).
pub fn restore_terminal() {
    let _ = disable_raw_mode();
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn decode(bytes: &[u8]) -> Vec<Key> {
        let mut decoder = KeyDecoder::new();
        let mut keys = decoder.decode(bytes);
        keys.extend(decoder.flush());
        keys
    }

    /// 每次 read() 只返回一个预设的 chunk
    struct ChunkedInput {
        chunks: VecDeque<&'static [u8]>,
    }

    impl ChunkedInput {
        fn new(chunks: &[&'static str]) -> Self {
            Self {
                chunks: chunks.iter().map(|c| c.as_bytes()).collect(),
            }
        }
    }

    impl Read for ChunkedInput {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.chunks.pop_front() {
                Some(chunk) => {
                    buf[..chunk.len()].copy_from_slice(chunk);
                    Ok(chunk.len())
                }
                None => Ok(0),
            }
        }
    }

    // 模拟终端：只要还有 chunk 就视为"有输入"
    fn chunks_ready(input: &ChunkedInput, _timeout: Duration) -> io::Result<bool> {
        Ok(!input.chunks.is_empty())
    }

    fn never_ready(_input: &ChunkedInput, _timeout: Duration) -> io::Result<bool> {
        Ok(false)
    }

    fn read_all(reader: &mut impl KeyReader) -> Vec<Key> {
        let mut keys = Vec::new();
        while let Ok(key) = reader.read_key() {
            keys.push(key);
        }
        keys
    }

    #[test]
    fn test_decode_plain_keys() {
        assert_eq!(
            decode(b"a q\r\n"),
            vec![
                Key::Char('a'),
                Key::Space,
                Key::Char('q'),
                Key::Enter,
                Key::Enter
            ]
        );
        assert_eq!(decode(&[0x03]), vec![Key::Interrupt]);
        assert_eq!(decode(&[0x7f]), vec![Key::Unknown]);
    }

    #[test]
    fn test_decode_arrows() {
        assert_eq!(decode(b"\x1b[A"), vec![Key::Up]);
        assert_eq!(decode(b"\x1b[B"), vec![Key::Down]);
        assert_eq!(decode(b"\x1bOA"), vec![Key::Up]);
        assert_eq!(decode(b"\x1b[C\x1b[D"), vec![Key::Unknown, Key::Unknown]);
        assert_eq!(decode(b"\x1b[1;5B"), vec![Key::Down]);
        assert_eq!(decode(b"\x1b[3~"), vec![Key::Unknown]);
    }

    #[test]
    fn test_decode_lone_escape() {
        assert_eq!(decode(b"\x1b"), vec![Key::Esc]);
        assert_eq!(decode(b"\x1bq"), vec![Key::Esc, Key::Char('q')]);
    }

    #[test]
    fn test_decode_keeps_state_across_chunks() {
        let mut decoder = KeyDecoder::new();
        assert_eq!(decoder.decode(b"\x1b["), Vec::<Key>::new());
        assert!(decoder.is_pending());
        assert_eq!(decoder.decode(b"A"), vec![Key::Up]);
        assert!(!decoder.is_pending());

        assert_eq!(decoder.decode(b"\x1b"), Vec::<Key>::new());
        assert_eq!(decoder.decode(b"[B"), vec![Key::Down]);
    }

    #[test]
    fn test_flush_ends_unfinished_sequence() {
        let mut decoder = KeyDecoder::new();
        assert_eq!(decoder.flush(), None);

        decoder.decode(b"\x1b");
        assert_eq!(decoder.flush(), Some(Key::Esc));
        decoder.decode(b"\x1b[1;");
        assert_eq!(decoder.flush(), Some(Key::Unknown));
        // flush 之后回到 Idle
        assert_eq!(decoder.decode(b"A"), vec![Key::Char('A')]);
    }

    #[test]
    fn test_decode_utf8_chars() {
        assert_eq!(decode("é中".as_bytes()), vec![Key::Char('é'), Key::Char('中')]);
        assert_eq!(decode(&[0xe4, 0xb8]), vec![Key::Unknown, Key::Unknown]);
    }

    #[test]
    fn test_byte_reader_yields_keys_in_order() {
        let input: &[u8] = b"\x1b[B \r";
        let mut reader = ByteKeyReader::new(input);
        assert_eq!(reader.read_key().unwrap(), Key::Down);
        assert_eq!(reader.read_key().unwrap(), Key::Space);
        assert_eq!(reader.read_key().unwrap(), Key::Enter);
        let err = reader.read_key().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    // === 跨 read() 分片的转义序列 ===

    #[test]
    fn test_byte_reader_joins_split_arrow() {
        let input = ChunkedInput::new(&["\x1b[B", "\x1b[", "A", "\x1b[B", "\r"]);
        let mut reader = ByteKeyReader::with_input_wait(input, chunks_ready);
        assert_eq!(
            read_all(&mut reader),
            vec![Key::Down, Key::Up, Key::Down, Key::Enter]
        );
    }

    #[test]
    fn test_byte_reader_split_after_escape_byte() {
        let input = ChunkedInput::new(&["\x1b", "[A", " "]);
        let mut reader = ByteKeyReader::with_input_wait(input, chunks_ready);
        assert_eq!(read_all(&mut reader), vec![Key::Up, Key::Space]);
    }

    #[test]
    fn test_byte_reader_lone_escape_after_timeout() {
        let input = ChunkedInput::new(&["\x1b", "q"]);
        let mut reader = ByteKeyReader::with_input_wait(input, never_ready);
        assert_eq!(reader.read_key().unwrap(), Key::Esc);
        assert_eq!(reader.read_key().unwrap(), Key::Char('q'));
    }

    #[test]
    fn test_byte_reader_cut_sequence_at_eof() {
        let input: &[u8] = b"\x1b[";
        let mut reader = ByteKeyReader::new(input);
        assert_eq!(reader.read_key().unwrap(), Key::Unknown);
        let err = reader.read_key().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}
