//! Request payloads accepted by the gateway and the shapes it forwards.

use serde::{Deserialize, Serialize};

/// Login form submitted by the client.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendCredentials {
    pub email: String,
    pub password: String,
}

/// Login body expected by the backend (`{user: {email, password}}`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendLoginRequest {
    pub user: BackendCredentials,
}

impl From<LoginRequest> for BackendLoginRequest {
    fn from(req: LoginRequest) -> Self {
        Self {
            user: BackendCredentials {
                email: req.email,
                password: req.password,
            },
        }
    }
}

/// Direct message submitted by the client.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SendMessageRequest {
    pub receiver_id: i64,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendMessage {
    pub receiver_id: i64,
    pub content: String,
}

/// Message body expected by the backend (`{message: {receiver_id, content}}`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendMessageRequest {
    pub message: BackendMessage,
}

impl From<SendMessageRequest> for BackendMessageRequest {
    fn from(req: SendMessageRequest) -> Self {
        Self {
            message: BackendMessage {
                receiver_id: req.receiver_id,
                content: req.content,
            },
        }
    }
}
