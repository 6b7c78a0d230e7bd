//! Cloudflare API type definitions

use serde::Deserialize;

/// Cloudflare API envelope, common to every endpoint.
#[derive(Debug, Deserialize)]
pub struct CloudflareResponse<T> {
    pub success: bool,
    pub result: Option<T>,
    pub errors: Option<Vec<CloudflareError>>,
    pub result_info: Option<CloudflareResultInfo>,
}

#[derive(Debug, Deserialize)]
pub struct CloudflareError {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct CloudflareResultInfo {
    #[allow(dead_code)]
    pub page: u32,
    pub total_pages: u32,
}

/// Cloudflare zone entry.
#[derive(Debug, Deserialize)]
pub struct CloudflareZone {
    pub id: String,
    pub name: String,
}

/// Cloudflare DNS record (response shape).
#[derive(Debug, Deserialize)]
pub struct CloudflareDnsRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub name: String,
    pub content: String,
    pub ttl: u32,
    pub priority: Option<u16>,
    pub proxied: Option<bool>,
    /// Structured data for CAA (and similar) record types.
    pub data: Option<CloudflareCaaData>,
}

/// `data` field of a CAA record.
#[derive(Debug, Deserialize)]
pub struct CloudflareCaaData {
    pub flags: u8,
    pub tag: String,
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_zone_list_envelope() {
        let body = r#"{
            "success": true,
            "errors": [],
            "result": [
                {"id": "z1", "name": "example.com", "status": "active"},
                {"id": "z2", "name": "sub.example.com", "status": "active"}
            ],
            "result_info": {"page": 1, "per_page": 50, "total_pages": 1, "total_count": 2}
        }"#;
        let resp: CloudflareResponse<Vec<CloudflareZone>> = serde_json::from_str(body).unwrap();
        assert!(resp.success);
        let zones = resp.result.unwrap();
        assert_eq!(zones.len(), 2);
        assert_eq!(zones[1].name, "sub.example.com");
        assert_eq!(resp.result_info.unwrap().total_pages, 1);
    }

    #[test]
    fn deserialize_caa_record_with_data() {
        let body = r#"{
            "id": "r1",
            "type": "CAA",
            "name": "example.com",
            "content": "0 issue \"letsencrypt.org\"",
            "ttl": 60,
            "data": {"flags": 0, "tag": "issue", "value": "letsencrypt.org"}
        }"#;
        let record: CloudflareDnsRecord = serde_json::from_str(body).unwrap();
        let data = record.data.unwrap();
        assert_eq!(data.tag, "issue");
        assert_eq!(data.value, "letsencrypt.org");
    }

    #[test]
    fn deserialize_error_envelope() {
        let body = r#"{
            "success": false,
            "errors": [{"code": 9109, "message": "Unauthorized"}],
            "result": null
        }"#;
        let resp: CloudflareResponse<Vec<CloudflareZone>> = serde_json::from_str(body).unwrap();
        assert!(!resp.success);
        let errors = resp.errors.unwrap();
        assert_eq!(errors[0].code, 9109);
    }
}
