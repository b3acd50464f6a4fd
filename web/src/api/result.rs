use serde::Serialize;

#[derive(Serialize)]
pub struct R<T: Serialize> {
    code: u16,
    message: String,
    data: Option<T>,
}

impl R<()> {
    pub fn success(msg: &str) -> Self {
        R {
            code: 0,
            message: msg.to_string(),
            data: None,
        }
    }

    pub fn error(code: u16, msg: &str) -> Self {
        R {
            code,
            message: msg.to_string(),
            data: None,
        }
    }
}

impl<T: Serialize> R<T> {
    pub fn success_with(msg: &str, data: T) -> Self {
        R {
            code: 0,
            message: msg.to_string(),
            data: Some(data),
        }
    }
}
