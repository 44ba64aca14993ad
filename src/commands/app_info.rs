use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppInfoResponse {
    pub product_name: &'static str,
    pub version: &'static str,
    pub platform: &'static str,
    pub arch: &'static str,
}

pub fn app_info() -> AppInfoResponse {
    AppInfoResponse {
        product_name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        platform: std::env::consts::OS,
        arch: std::env::consts::ARCH,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_info_contains_build_metadata() {
        let response = app_info();

        assert_eq!(response.product_name, "market-desk");
        assert!(!response.version.is_empty());
        assert!(!response.platform.is_empty());
        assert!(!response.arch.is_empty());
    }
}
