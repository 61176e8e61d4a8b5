use anyhow::{bail, Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

// Larger frames are refused rather than buffered.
pub const MAX_FRAME: usize = 64 * 1024 * 1024;

#[derive(Copy, Clone, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Framing {
    /// 4-byte native-endian length prefix, as browsers use for native messaging
    #[value(name = "native")] Native,
    /// one JSON document per line
    #[value(name = "lines")] Lines,
}

/// Next length-prefixed frame, or `None` on a clean EOF. A zero-length frame
/// is returned as an empty payload and fails to decode like any other bad input.
pub async fn read_native<R: AsyncRead + Unpin>(r: &mut R) -> Result<Option<Vec<u8>>> {
    let mut len_bytes = [0u8; 4];
    match r.read_exact(&mut len_bytes).await {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e).context("read frame length"),
    }
    let len = u32::from_ne_bytes(len_bytes) as usize;
    if len > MAX_FRAME { bail!("frame of {} bytes exceeds limit of {}", len, MAX_FRAME); }
    let mut buf = vec![0u8; len];
    r.read_exact(&mut buf).await.context("read frame body")?;
    Ok(Some(buf))
}

pub async fn write_native<W: AsyncWrite + Unpin>(w: &mut W, payload: &[u8]) -> Result<()> {
    let len = u32::try_from(payload.len()).context("frame too large for length prefix")?;
    w.write_all(&len.to_ne_bytes()).await?;
    w.write_all(payload).await?;
    w.flush().await?;
    Ok(())
}

/// Next non-blank line as raw bytes, or `None` on EOF. Bytes are not checked
/// for UTF-8 here; that is the decoder's job.
pub async fn read_line<R: AsyncBufRead + Unpin>(r: &mut R) -> Result<Option<Vec<u8>>> {
    loop {
        let mut line = Vec::new();
        let n = (&mut *r).take(MAX_FRAME as u64 + 1).read_until(b'\n', &mut line).await.context("read line")?;
        if n == 0 { return Ok(None); }
        if n > MAX_FRAME { bail!("line exceeds limit of {} bytes", MAX_FRAME); }
        let trimmed = line.trim_ascii();
        if !trimmed.is_empty() { return Ok(Some(trimmed.to_vec())); }
    }
}

pub async fn write_line<W: AsyncWrite + Unpin>(w: &mut W, payload: &[u8]) -> Result<()> {
    w.write_all(payload).await?;
    w.write_all(b"\n").await?;
    w.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::BufReader;

    #[tokio::test]
    async fn native_frames_roundtrip() {
        let mut wire: Vec<u8> = Vec::new();
        write_native(&mut wire, br#"{"action":"getJobInfo"}"#).await.unwrap();
        write_native(&mut wire, b"{}").await.unwrap();

        let mut r = &wire[..];
        assert_eq!(read_native(&mut r).await.unwrap().as_deref(), Some(&br#"{"action":"getJobInfo"}"#[..]));
        assert_eq!(read_native(&mut r).await.unwrap().as_deref(), Some(&b"{}"[..]));
        assert_eq!(read_native(&mut r).await.unwrap(), None);
    }

    #[tokio::test]
    async fn oversized_native_frame_is_rejected() {
        let mut wire = ((MAX_FRAME + 1) as u32).to_ne_bytes().to_vec();
        wire.extend_from_slice(b"xx");
        let mut r = &wire[..];
        assert!(read_native(&mut r).await.is_err());
    }

    #[tokio::test]
    async fn zero_length_native_frame_is_not_eof() {
        let mut wire = 0u32.to_ne_bytes().to_vec();
        write_native(&mut wire, b"{}").await.unwrap();
        let mut r = &wire[..];
        assert_eq!(read_native(&mut r).await.unwrap(), Some(Vec::new()));
        assert_eq!(read_native(&mut r).await.unwrap().as_deref(), Some(&b"{}"[..]));
        assert_eq!(read_native(&mut r).await.unwrap(), None);
    }

    #[tokio::test]
    async fn invalid_utf8_line_is_passed_through() {
        let input = b"\xff\xfe garbage\n{\"a\":1}\n";
        let mut r = BufReader::new(&input[..]);
        assert_eq!(read_line(&mut r).await.unwrap().as_deref(), Some(&b"\xff\xfe garbage"[..]));
        assert_eq!(read_line(&mut r).await.unwrap().as_deref(), Some(&b"{\"a\":1}"[..]));
        assert_eq!(read_line(&mut r).await.unwrap(), None);
    }

    #[tokio::test]
    async fn lines_skip_blanks() {
        let input = b"{\"a\":1}\n\n   \n{\"b\":2}\n";
        let mut r = BufReader::new(&input[..]);
        assert_eq!(read_line(&mut r).await.unwrap().as_deref(), Some(&b"{\"a\":1}"[..]));
        assert_eq!(read_line(&mut r).await.unwrap().as_deref(), Some(&b"{\"b\":2}"[..]));
        assert_eq!(read_line(&mut r).await.unwrap(), None);
    }
}
