//! Monit 상태 수집 모듈
//!
//! Monit HTTP 인터페이스에서 XML 상태 문서를 가져오고 디코딩합니다.
//!
//! # Example
//!
//! ```ignore
//! use monit_exporter::collector::{parse_status, MonitClient};
//!
//! let client = MonitClient::new("http://localhost:2812/_status?format=xml&level=full", 5000, false)?;
//! let body = client.fetch_status().await?;
//! let document = parse_status(&body)?;
//! ```

mod client;
mod parser;

pub use client::MonitClient;
pub use parser::{
    parse_status, ByteCount, CollectResult, Cpu, DiskIo, EntityRecord, EntityType, Link,
    LinkDirection, Memory, NetworkCount, PortCheck, ServerInfo, ServiceTime, StatusDocument,
    UnixSocketCheck,
};

use crate::config::MonitConfig;

/// 설정 기반 클라이언트 생성
pub fn client_from_config(config: &MonitConfig) -> CollectResult<MonitClient> {
    let mut client = MonitClient::new(&config.scrape_uri, config.timeout_ms, config.ignore_ssl)?;
    if let Some((user, password)) = config.credentials() {
        client = client.with_auth(user, password);
    }
    Ok(client)
}

/// Collector 구조체 - 조회와 디코딩을 묶는 래퍼
#[derive(Clone)]
pub struct Collector {
    client: MonitClient,
}

impl Collector {
    /// 새 Collector 생성
    pub fn new(client: MonitClient) -> Self {
        Self { client }
    }

    /// 상태 문서 조회 후 디코딩
    ///
    /// A failed fetch never reaches the decoder.
    pub async fn collect(&self) -> CollectResult<StatusDocument> {
        let body = self.client.fetch_status().await?;

        match parse_status(&body) {
            Ok(document) => {
                if let Some(server) = &document.server {
                    tracing::debug!(
                        monit_version = %server.version,
                        localhostname = %server.localhostname,
                        services = document.services.len(),
                        "Monit status decoded"
                    );
                }
                Ok(document)
            }
            Err(e) => {
                tracing::debug!(
                    body = %String::from_utf8_lossy(&body),
                    "Undecodable monit status"
                );
                Err(e.into())
            }
        }
    }

    /// 클라이언트 참조 반환
    pub fn client(&self) -> &MonitClient {
        &self.client
    }
}
