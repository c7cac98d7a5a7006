use serde::Serialize;
use thiserror::Error;

/// Broad class of a failed weather query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Config,
    Lookup,
    Transport,
    Service,
    Format,
    EmptyData,
}

/// Faults reported by the data.go.kr gateway in its XML error envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceFault {
    UnregisteredKey,
    RateLimited,
    Expired,
    InvalidParameter,
    Unknown,
}

impl ServiceFault {
    /// Match the first known fault token in an XML error body.
    pub fn from_xml(body: &str) -> Self {
        // The shorter token is a prefix of the longer one, so both map to the same fault.
        const TOKENS: &[(&str, ServiceFault)] = &[
            ("SERVICE_KEY_IS_NOT_REGISTERED_ERROR", ServiceFault::UnregisteredKey),
            ("SERVICE_KEY_IS_NOT_REGISTERED", ServiceFault::UnregisteredKey),
            (
                "LIMITED_NUMBER_OF_SERVICE_REQUESTS_EXCEEDS_ERROR",
                ServiceFault::RateLimited,
            ),
            ("DEADLINE_HAS_EXPIRED", ServiceFault::Expired),
            ("INVALID_PARAMETER", ServiceFault::InvalidParameter),
        ];

        TOKENS
            .iter()
            .find(|(token, _)| body.contains(token))
            .map(|(_, fault)| *fault)
            .unwrap_or(ServiceFault::Unknown)
    }

    pub fn message(&self) -> &'static str {
        match self {
            ServiceFault::UnregisteredKey => {
                "등록되지 않은 API 키입니다. 공공데이터포털에서 발급받은 올바른 API 키를 사용해주세요."
            }
            ServiceFault::RateLimited => "일일 요청 한도를 초과했습니다. 내일 다시 시도해주세요.",
            ServiceFault::Expired => {
                "API 사용 기간이 만료되었습니다. 공공데이터포털에서 API 사용 신청을 갱신해주세요."
            }
            ServiceFault::InvalidParameter => {
                "잘못된 파라미터가 전달되었습니다. base_date와 base_time을 확인해주세요."
            }
            ServiceFault::Unknown => {
                "API 키가 유효하지 않거나 등록되지 않았습니다. 공공데이터포털에서 발급받은 올바른 API 키를 사용해주세요."
            }
        }
    }
}

/// Every way a weather query can fail. `Display` is the message shown to the user.
#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("기상청 API 키가 설정되지 않았습니다. .env 파일에 유효한 API 키를 설정해주세요.")]
    MissingApiKey,

    #[error("'{location}'에 대한 위치 코드가 없습니다. 다음 중 하나를 입력해주세요: {supported}")]
    UnknownLocation { location: String, supported: String },

    #[error("날씨 정보를 가져오는 중 오류가 발생했습니다. 상태 코드: {0}")]
    HttpStatus(u16),

    #[error("날씨 정보를 가져오는 중 오류가 발생했습니다: {message}")]
    Network {
        message: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{}", .0.message())]
    Gateway(ServiceFault),

    #[error("API 호출 오류: {0}")]
    ResultCode(String),

    #[error("API 응답을 JSON으로 파싱할 수 없습니다.")]
    InvalidJson(#[source] serde_json::Error),

    #[error("API 응답 형식이 올바르지 않습니다.")]
    MissingHeader,

    #[error("API 응답에 날씨 데이터가 없습니다.")]
    MissingItems,

    #[error("날씨 데이터가 없습니다.")]
    NoItems,

    #[error("도구 인자를 해석할 수 없습니다: {0}")]
    InvalidToolArguments(#[source] serde_json::Error),
}

impl ForecastError {
    /// Wrap a transport failure. The request URL (which carries the service key)
    /// is stripped and the full cause chain is kept in the message.
    pub fn network(err: reqwest::Error) -> Self {
        let err = err.without_url();

        let mut message = err.to_string();
        let mut cause = std::error::Error::source(&err);
        while let Some(inner) = cause {
            message.push_str(": ");
            message.push_str(&inner.to_string());
            cause = inner.source();
        }

        ForecastError::Network {
            message,
            source: err,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ForecastError::MissingApiKey => ErrorKind::Config,
            ForecastError::UnknownLocation { .. } | ForecastError::InvalidToolArguments(_) => {
                ErrorKind::Lookup
            }
            ForecastError::HttpStatus(_) | ForecastError::Network { .. } => ErrorKind::Transport,
            ForecastError::Gateway(_) | ForecastError::ResultCode(_) => ErrorKind::Service,
            ForecastError::InvalidJson(_)
            | ForecastError::MissingHeader
            | ForecastError::MissingItems => ErrorKind::Format,
            ForecastError::NoItems => ErrorKind::EmptyData,
        }
    }
}
