use async_trait::async_trait;
use common::{EnrollmentSignal, OnboardingRequest};
use tracing::warn;

/// Downstream enrollment system client.
///
/// Implementations must always produce a signal: transport failures map to
/// 5xx-class codes so an attempt is never left pending.
#[async_trait]
pub trait EnrollmentApi: Send + Sync {
    async fn enroll(&self, request: &OnboardingRequest) -> EnrollmentSignal;
}

/// Real HTTP client for the external enrollment endpoint.
pub struct HttpEnrollmentClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpEnrollmentClient {
    pub fn new(base_url: String, timeout_secs: u64) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl EnrollmentApi for HttpEnrollmentClient {
    async fn enroll(&self, request: &OnboardingRequest) -> EnrollmentSignal {
        let url = format!("{}/enroll", self.base_url);
        match self.client.post(&url).json(request).send().await {
            Ok(response) => EnrollmentSignal::new(response.status().as_u16()),
            Err(e) if e.is_timeout() => {
                warn!(national_id = %request.national_id, "Enrollment request timed out");
                EnrollmentSignal::new(504)
            }
            Err(e) => {
                warn!(
                    national_id = %request.national_id,
                    error = %e,
                    "Enrollment request failed"
                );
                EnrollmentSignal::new(503)
            }
        }
    }
}

/// Deterministic stand-in for the external system, keyed off the last
/// character of the identity number. Used in the default `simulated` mode
/// and in tests.
pub struct SimulatedEnrollmentClient;

#[async_trait]
impl EnrollmentApi for SimulatedEnrollmentClient {
    async fn enroll(&self, request: &OnboardingRequest) -> EnrollmentSignal {
        let code = match request.national_id.chars().last() {
            Some('0') => 200,
            Some('1') => 409,
            Some('2') => 500,
            _ => 400,
        };
        EnrollmentSignal::new(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(national_id: &str) -> OnboardingRequest {
        OnboardingRequest {
            national_id: national_id.to_string(),
            roll_no: "R-1".to_string(),
            name: "Test Student".to_string(),
            class_group: "5A".to_string(),
            school: None,
            date_of_birth: "2013-01-01".to_string(),
        }
    }

    #[tokio::test]
    async fn test_simulated_client_mapping() {
        let client = SimulatedEnrollmentClient;
        assert_eq!(client.enroll(&request("1230")).await.status_code, 200);
        assert_eq!(client.enroll(&request("1231")).await.status_code, 409);
        assert_eq!(client.enroll(&request("1232")).await.status_code, 500);
        assert_eq!(client.enroll(&request("1233")).await.status_code, 400);
        assert_eq!(client.enroll(&request("")).await.status_code, 400);
    }

    #[tokio::test]
    async fn test_http_client_timeout_maps_to_retryable() {
        // Accept connections but never respond.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            loop {
                let Ok((socket, _)) = listener.accept().await else {
                    break;
                };
                tokio::spawn(async move {
                    let _socket = socket;
                    tokio::time::sleep(std::time::Duration::from_secs(30)).await;
                });
            }
        });

        let client = HttpEnrollmentClient::new(format!("http://{addr}"), 1).unwrap();
        let signal = client.enroll(&request("1230")).await;
        assert_eq!(signal.status_code, 504);
    }

    #[tokio::test]
    async fn test_http_client_transport_error_maps_to_retryable() {
        // Grab a free port, then close it so connections are refused.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = HttpEnrollmentClient::new(format!("http://{addr}"), 1).unwrap();
        let signal = client.enroll(&request("1230")).await;
        assert_eq!(signal.status_code, 503);
    }
}
