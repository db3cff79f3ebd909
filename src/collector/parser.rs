//! Monit XML 상태 문서 파서
//!
//! Monit `_status?format=xml` 응답을 디코딩하여 내부 데이터 구조로 변환합니다.
//! 문서가 선언한 문자 인코딩(예: ISO-8859-1)을 먼저 UTF-8로 변환한 뒤 파싱합니다.

use encoding_rs::{Encoding, UTF_8};
use serde::Deserialize;
use std::fmt;

use crate::error::{CollectorError, DecodeError};

/// Collector 작업 결과 타입
pub type CollectResult<T> = Result<T, CollectorError>;

/// Monit service type, as carried by the `type` attribute of `<service>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityType {
    Filesystem,
    Directory,
    File,
    Process,
    Host,
    System,
    Fifo,
    Program,
    Network,
}

impl EntityType {
    /// Every type, in Monit's numeric order
    pub const ALL: [EntityType; 9] = [
        EntityType::Filesystem,
        EntityType::Directory,
        EntityType::File,
        EntityType::Process,
        EntityType::Host,
        EntityType::System,
        EntityType::Fifo,
        EntityType::Program,
        EntityType::Network,
    ];

    /// Label value used for the `type` label of `monit_service_check`
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Filesystem => "filesystem",
            EntityType::Directory => "directory",
            EntityType::File => "file",
            EntityType::Process => "process",
            EntityType::Host => "host",
            EntityType::System => "system",
            EntityType::Fifo => "fifo",
            EntityType::Program => "program",
            EntityType::Network => "network",
        }
    }

    /// Memory and CPU usage are only populated for processes and the system
    pub fn reports_resources(&self) -> bool {
        match self {
            EntityType::Process | EntityType::System => true,
            EntityType::Filesystem
            | EntityType::Directory
            | EntityType::File
            | EntityType::Host
            | EntityType::Fifo
            | EntityType::Program
            | EntityType::Network => false,
        }
    }

    /// Disk read/write counters are only populated for processes and filesystems
    pub fn reports_disk_io(&self) -> bool {
        match self {
            EntityType::Process | EntityType::Filesystem => true,
            EntityType::Directory
            | EntityType::File
            | EntityType::Host
            | EntityType::System
            | EntityType::Fifo
            | EntityType::Program
            | EntityType::Network => false,
        }
    }

    /// Link state and statistics are only populated for network interfaces
    pub fn reports_link(&self) -> bool {
        match self {
            EntityType::Network => true,
            EntityType::Filesystem
            | EntityType::Directory
            | EntityType::File
            | EntityType::Process
            | EntityType::Host
            | EntityType::System
            | EntityType::Fifo
            | EntityType::Program => false,
        }
    }
}

impl TryFrom<i64> for EntityType {
    type Error = i64;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        usize::try_from(code)
            .ok()
            .and_then(|index| EntityType::ALL.get(index).copied())
            .ok_or(code)
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 디코딩된 상태 문서
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusDocument {
    /// `<server>` 블록 (로그용)
    pub server: Option<ServerInfo>,
    /// `<service>` 목록 (문서 순서 유지)
    pub services: Vec<EntityRecord>,
}

/// Monit 데몬 정보
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerInfo {
    pub version: String,
    pub localhostname: String,
    pub uptime: u64,
    pub poll: u64,
}

/// 개별 서비스 체크
#[derive(Debug, Clone, PartialEq)]
pub struct EntityRecord {
    pub entity_type: EntityType,
    pub name: String,
    pub status: i64,
    pub monitored: String,
    pub memory: Memory,
    pub cpu: Cpu,
    pub disk_write: DiskIo,
    pub disk_read: DiskIo,
    pub service_time: ServiceTime,
    pub ports: Vec<PortCheck>,
    pub unix_sockets: Vec<UnixSocketCheck>,
    pub link: Link,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Memory {
    pub percent: f64,
    #[serde(rename = "percenttotal")]
    pub percent_total: f64,
    pub kilobyte: i64,
    #[serde(rename = "kilobytetotal")]
    pub kilobyte_total: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Cpu {
    pub percent: f64,
    #[serde(rename = "percenttotal")]
    pub percent_total: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DiskIo {
    pub bytes: ByteCount,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ByteCount {
    pub count: i64,
    pub total: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServiceTime {
    pub read: f64,
    pub write: f64,
    pub wait: f64,
    pub run: f64,
}

/// `<port>` 체크 (TCP/UDP)
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PortCheck {
    pub hostname: String,
    #[serde(rename = "portnumber")]
    pub port_number: String,
    pub protocol: String,
    #[serde(rename = "type")]
    pub socket_type: String,
    #[serde(rename = "responsetime")]
    pub response_time: f64,
}

/// `<unix>` 소켓 체크
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct UnixSocketCheck {
    pub path: String,
    pub protocol: String,
    #[serde(rename = "responsetime")]
    pub response_time: f64,
}

/// `<link>` 네트워크 인터페이스 정보
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Link {
    pub state: i64,
    pub speed: i64,
    pub duplex: i64,
    pub download: LinkDirection,
    pub upload: LinkDirection,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LinkDirection {
    pub packets: NetworkCount,
    pub bytes: NetworkCount,
    pub errors: NetworkCount,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct NetworkCount {
    pub now: i64,
    pub total: i64,
}

/// 내부 파싱용 구조체
#[derive(Deserialize)]
struct RawDocument {
    #[serde(default)]
    server: Option<ServerInfo>,
    #[serde(rename = "service", default)]
    services: Vec<RawService>,
}

#[derive(Deserialize)]
struct RawService {
    #[serde(rename = "@type", default)]
    service_type: Option<String>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    status: i64,
    #[serde(rename = "monitor", default)]
    monitored: String,
    #[serde(default)]
    memory: Memory,
    #[serde(default)]
    cpu: Cpu,
    #[serde(rename = "write", default)]
    disk_write: DiskIo,
    #[serde(rename = "read", default)]
    disk_read: DiskIo,
    #[serde(rename = "servicetime", default)]
    service_time: ServiceTime,
    #[serde(rename = "port", default)]
    ports: Vec<PortCheck>,
    #[serde(rename = "unix", default)]
    unix_sockets: Vec<UnixSocketCheck>,
    #[serde(default)]
    link: Link,
    #[serde(default)]
    system: Option<SystemUsage>,
}

/// System services nest their usage under `<system>` instead of `<memory>`/`<cpu>`
#[derive(Deserialize, Default)]
#[serde(default)]
struct SystemUsage {
    memory: SystemMemory,
    cpu: SystemCpu,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct SystemMemory {
    percent: f64,
    kilobyte: i64,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct SystemCpu {
    user: f64,
    system: f64,
}

impl RawService {
    /// A missing `type` attribute reads as code 0; anything that is not a
    /// known code is returned as-is for logging
    fn entity_type(&self) -> Result<EntityType, String> {
        let Some(code) = self.service_type.as_deref().map(str::trim) else {
            return Ok(EntityType::Filesystem);
        };
        code.parse::<i64>()
            .ok()
            .and_then(|code| EntityType::try_from(code).ok())
            .ok_or_else(|| code.to_string())
    }

    fn into_record(self) -> Result<EntityRecord, String> {
        let entity_type = self.entity_type()?;

        let (memory, cpu) = match self.system {
            Some(usage) => (
                Memory {
                    percent: usage.memory.percent,
                    percent_total: usage.memory.percent,
                    kilobyte: usage.memory.kilobyte,
                    kilobyte_total: usage.memory.kilobyte,
                },
                Cpu {
                    percent: usage.cpu.user + usage.cpu.system,
                    percent_total: usage.cpu.user + usage.cpu.system,
                },
            ),
            None => (self.memory, self.cpu),
        };

        Ok(EntityRecord {
            entity_type,
            name: self.name,
            status: self.status,
            monitored: self.monitored,
            memory,
            cpu,
            disk_write: self.disk_write,
            disk_read: self.disk_read,
            service_time: self.service_time,
            ports: self.ports,
            unix_sockets: self.unix_sockets,
            link: self.link,
        })
    }
}

/// 상태 문서 파싱
///
/// The document is transcoded from its declared encoding before the XML
/// structure is parsed. Elements this exporter does not know are ignored.
pub fn parse_status(data: &[u8]) -> Result<StatusDocument, DecodeError> {
    let encoding = declared_encoding(data)?;
    // decode() also sniffs and strips a BOM
    let (text, actual, had_errors) = encoding.decode(data);
    if had_errors {
        return Err(DecodeError::InvalidCharacters {
            encoding: actual.name(),
        });
    }

    let raw: RawDocument = quick_xml::de::from_str(&text)?;

    let services = raw
        .services
        .into_iter()
        .filter_map(|service| {
            let name = service.name.clone();
            match service.into_record() {
                Ok(record) => Some(record),
                Err(code) => {
                    tracing::warn!(
                        service = %name,
                        service_type = %code,
                        "Skipping service with unknown type"
                    );
                    None
                }
            }
        })
        .collect();

    Ok(StatusDocument {
        server: raw.server,
        services,
    })
}

/// Resolve the character encoding of the raw document
///
/// A BOM takes precedence over the XML declaration; a document without an
/// `encoding` pseudo-attribute is UTF-8.
fn declared_encoding(data: &[u8]) -> Result<&'static Encoding, DecodeError> {
    if let Some((encoding, _)) = Encoding::for_bom(data) {
        return Ok(encoding);
    }

    let Some(label) = declaration_label(data) else {
        return Ok(UTF_8);
    };

    Encoding::for_label(label)
        .ok_or_else(|| DecodeError::UnknownEncoding(String::from_utf8_lossy(label).into_owned()))
}

/// `encoding="..."` value of the `<?xml ... ?>` declaration, if any
fn declaration_label(data: &[u8]) -> Option<&[u8]> {
    let rest = data.strip_prefix(b"<?xml")?;
    let declaration = &rest[..find(rest, b"?>")?];
    let after_key = &declaration[find(declaration, b"encoding")? + b"encoding".len()..];

    let value = after_key.trim_ascii_start().strip_prefix(b"=")?;
    let value = value.trim_ascii_start();
    let quote = *value.first().filter(|q| **q == b'"' || **q == b'\'')?;
    let value = &value[1..];
    let end = value.iter().position(|b| *b == quote)?;
    Some(&value[..end])
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
