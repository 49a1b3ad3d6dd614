//! Minimal HTTP/1.1 message handling.
//!
//! Only what the endpoint needs: one request per connection, bodies sized by
//! `Content-Length`, responses always closing the connection. Chunked
//! transfer encoding is refused.

use std::{fmt, io, time::Duration};

use serde::Serialize;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Largest accepted request line plus headers.
const MAX_HEAD_BYTES: usize = 16 * 1024;

/// Time a client gets to send a complete request.
pub const READ_TIMEOUT: Duration = Duration::from_secs(10);

const HEAD_END: &[u8] = b"\r\n\r\n";

/// A parsed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    method: String,
    path: String,
    body: Vec<u8>,
}

impl Request {
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Returns the request path without its query string.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

/// Why a request could not be read.
#[derive(Debug)]
pub enum ReadError {
    /// The peer closed the connection before sending a request.
    Closed,
    Io(io::Error),
    Malformed(&'static str),
    HeadTooLarge,
    BodyTooLarge(usize),
    /// A body-carrying method arrived without `Content-Length`.
    LengthRequired,
    /// The request uses `Transfer-Encoding`.
    UnsupportedTransferEncoding(String),
    /// The request was not complete within the read timeout.
    TimedOut(Duration),
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed => write!(f, "connection closed"),
            Self::Io(err) => write!(f, "I/O error: {err}"),
            Self::Malformed(what) => write!(f, "malformed request: {what}"),
            Self::HeadTooLarge => write!(f, "request headers exceed {MAX_HEAD_BYTES} bytes"),
            Self::BodyTooLarge(len) => {
                write!(f, "request body of {len} bytes exceeds {MAX_BODY_BYTES} bytes")
            }
            Self::LengthRequired => write!(f, "request body requires a Content-Length header"),
            Self::UnsupportedTransferEncoding(encoding) => {
                write!(f, "transfer encoding `{encoding}` is not supported, send Content-Length")
            }
            Self::TimedOut(limit) => {
                write!(f, "request not received within {limit:?}")
            }
        }
    }
}

impl From<io::Error> for ReadError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl ReadError {
    /// Returns the response to send for this error, if the peer is still there.
    pub fn to_response(&self) -> Option<Response> {
        match self {
            Self::Closed | Self::Io(_) => None,
            Self::Malformed(_) => Some(Response::error(400, self.to_string())),
            Self::HeadTooLarge => Some(Response::error(431, self.to_string())),
            Self::BodyTooLarge(_) => Some(Response::error(413, self.to_string())),
            Self::LengthRequired => Some(Response::error(411, self.to_string())),
            Self::UnsupportedTransferEncoding(_) => Some(Response::error(501, self.to_string())),
            Self::TimedOut(_) => Some(Response::error(408, self.to_string())),
        }
    }
}

/// Reads one request from `reader`, giving up after `limit`.
///
/// # Errors
///
/// See [`ReadError`].
pub async fn read_request<R>(reader: &mut R, limit: Duration) -> Result<Request, ReadError>
where
    R: AsyncRead + Unpin,
{
    tokio::time::timeout(limit, read_message(reader))
        .await
        .map_err(|_| ReadError::TimedOut(limit))?
}

async fn read_message<R>(reader: &mut R) -> Result<Request, ReadError>
where
    R: AsyncRead + Unpin,
{
    let mut buffer = Vec::with_capacity(1024);
    let mut chunk = [0u8; 4096];

    let head_len = loop {
        if let Some(pos) = find_head_end(&buffer) {
            break pos;
        }
        if buffer.len() > MAX_HEAD_BYTES {
            return Err(ReadError::HeadTooLarge);
        }
        let n = reader.read(&mut chunk).await?;
        if n == 0 {
            return Err(if buffer.is_empty() {
                ReadError::Closed
            } else {
                ReadError::Malformed("unexpected end of headers")
            });
        }
        buffer.extend_from_slice(&chunk[..n]);
    };

    let head = std::str::from_utf8(&buffer[..head_len])
        .map_err(|_| ReadError::Malformed("headers are not UTF-8"))?;
    let mut lines = head.split("\r\n");

    let mut request_line = lines.next().unwrap_or_default().split_whitespace();
    let (Some(method), Some(target), Some(_version)) =
        (request_line.next(), request_line.next(), request_line.next())
    else {
        return Err(ReadError::Malformed("invalid request line"));
    };
    let method = method.to_string();
    let path = target.split_once('?').map_or(target, |(path, _)| path).to_string();

    let mut content_length = None;
    for line in lines {
        let Some((name, value)) = line.split_once(':') else {
            return Err(ReadError::Malformed("invalid header line"));
        };
        let name = name.trim();
        if name.eq_ignore_ascii_case("content-length") {
            let length = value
                .trim()
                .parse::<usize>()
                .map_err(|_| ReadError::Malformed("invalid Content-Length"))?;
            content_length = Some(length);
        } else if name.eq_ignore_ascii_case("transfer-encoding") {
            return Err(ReadError::UnsupportedTransferEncoding(value.trim().to_string()));
        }
    }

    let content_length = match content_length {
        Some(length) => length,
        None if matches!(method.as_str(), "POST" | "PUT" | "PATCH") => {
            return Err(ReadError::LengthRequired);
        }
        None => 0,
    };

    if content_length > MAX_BODY_BYTES {
        return Err(ReadError::BodyTooLarge(content_length));
    }

    let mut body = buffer.split_off(head_len + HEAD_END.len());
    body.truncate(content_length);
    if body.len() < content_length {
        let received = body.len();
        body.resize(content_length, 0);
        reader.read_exact(&mut body[received..]).await?;
    }

    Ok(Request { method, path, body })
}

fn find_head_end(buffer: &[u8]) -> Option<usize> {
    buffer.windows(HEAD_END.len()).position(|w| w == HEAD_END)
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

/// A complete response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status: u16,
    content_type: &'static str,
    body: Vec<u8>,
}

impl Response {
    pub fn new(status: u16, content_type: &'static str, body: Vec<u8>) -> Self {
        Self {
            status,
            content_type,
            body,
        }
    }

    /// A `text/plain` response.
    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self::new(status, "text/plain; charset=utf-8", body.into().into_bytes())
    }

    /// A JSON `{"error": message}` response.
    pub fn error(status: u16, message: impl AsRef<str>) -> Self {
        let body = serde_json::to_vec(&ErrorBody {
            error: message.as_ref(),
        })
        .unwrap_or_else(|_| b"{\"error\":\"internal error\"}".to_vec());
        Self::new(status, "application/json", body)
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn content_type(&self) -> &str {
        self.content_type
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Writes the status line, headers and body to `writer`.
    pub async fn write_to<W>(&self, writer: &mut W) -> io::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        let head = format!(
            "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            self.status,
            reason_phrase(self.status),
            self.content_type,
            self.body.len()
        );
        writer.write_all(head.as_bytes()).await?;
        writer.write_all(&self.body).await?;
        writer.flush().await
    }
}

fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        408 => "Request Timeout",
        411 => "Length Required",
        413 => "Payload Too Large",
        431 => "Request Header Fields Too Large",
        500 => "Internal Server Error",
        501 => "Not Implemented",
        _ => "Unknown",
    }
}
