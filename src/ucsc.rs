use std::io::Read;
use std::time::Duration;

use flate2::read::GzDecoder;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};

use crate::domain::AssemblyId;
use crate::error::KiraError;

pub const DEFAULT_BASE_URL: &str = "https://hgdownload.soe.ucsc.edu/goldenPath";

pub fn chrom_sizes_url(base_url: &str, assembly: &AssemblyId) -> String {
    format!(
        "{base}/{asm}/bigZips/{asm}.chrom.sizes",
        base = base_url.trim_end_matches('/'),
        asm = assembly.as_str()
    )
}

pub fn cytoband_url(base_url: &str, assembly: &AssemblyId) -> String {
    format!(
        "{}/{}/database/cytoBand.txt.gz",
        base_url.trim_end_matches('/'),
        assembly.as_str()
    )
}

pub trait UcscClient: Send + Sync {
    /// Returns the response body as text.
    fn fetch_text(&self, url: &str) -> Result<String, KiraError>;
    /// Returns the gunzipped response body as UTF-8 text.
    fn fetch_gzip_text(&self, url: &str) -> Result<String, KiraError>;
}

impl<T: UcscClient + ?Sized> UcscClient for &T {
    fn fetch_text(&self, url: &str) -> Result<String, KiraError> {
        (**self).fetch_text(url)
    }

    fn fetch_gzip_text(&self, url: &str) -> Result<String, KiraError> {
        (**self).fetch_gzip_text(url)
    }
}

#[derive(Clone)]
pub struct UcscHttpClient {
    client: Client,
}

impl UcscHttpClient {
    pub fn new() -> Result<Self, KiraError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("kira-gm/{}", env!("CARGO_PKG_VERSION")))
                .map_err(|err| KiraError::UcscHttp(err.to_string()))?,
        );
        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|err| KiraError::UcscHttp(err.to_string()))?;
        Ok(Self { client })
    }

    fn get(&self, url: &str) -> Result<reqwest::blocking::Response, KiraError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|err| KiraError::UcscHttp(err.to_string()))?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .ok()
                .filter(|body| !body.trim().is_empty())
                .unwrap_or_else(|| format!("UCSC request failed for {url}"));
            return Err(KiraError::UcscStatus { status, message });
        }
        Ok(response)
    }
}

impl UcscClient for UcscHttpClient {
    fn fetch_text(&self, url: &str) -> Result<String, KiraError> {
        self.get(url)?
            .text()
            .map_err(|err| KiraError::UcscHttp(err.to_string()))
    }

    fn fetch_gzip_text(&self, url: &str) -> Result<String, KiraError> {
        let bytes = self
            .get(url)?
            .bytes()
            .map_err(|err| KiraError::UcscHttp(err.to_string()))?;
        decode_gzip_text(bytes.as_ref())
    }
}

pub fn decode_gzip_text(bytes: &[u8]) -> Result<String, KiraError> {
    let mut decoder = GzDecoder::new(bytes);
    let mut text = String::new();
    decoder
        .read_to_string(&mut text)
        .map_err(|err| KiraError::Decode(err.to_string()))?;
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_goldenpath_urls() {
        let hg38: AssemblyId = "hg38".parse().unwrap();
        assert_eq!(
            chrom_sizes_url(DEFAULT_BASE_URL, &hg38),
            "https://hgdownload.soe.ucsc.edu/goldenPath/hg38/bigZips/hg38.chrom.sizes"
        );
        assert_eq!(
            cytoband_url("https://mirror.example/goldenPath/", &hg38),
            "https://mirror.example/goldenPath/hg38/database/cytoBand.txt.gz"
        );
    }
}
