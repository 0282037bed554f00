//! Shape checks applied to request bodies before they reach the storage layer.
//!
//! Serde already enforces field types and rejects unknown fields; these checks
//! cover what types alone cannot express (blank strings, non-positive ids).

use crate::api::{
    CreateCommentRequest, CreateMessageRequest, CreateMetadataRequest, CreatePingPongRequest,
    CreatePostRequest, CreateUserRequest, UpdateCommentRequest, UpdateMetadataRequest,
    UpdatePingPongRequest, UpdatePostRequest, UpdateUserRequest,
};

const MAX_USERNAME_LEN: usize = 64;

pub trait Validate {
    /// Returns a human readable reason when the value is unacceptable.
    fn validate(&self) -> Result<(), String>;
}

fn non_blank(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{} must not be empty", field));
    }
    Ok(())
}

fn positive_id(field: &str, value: i64) -> Result<(), String> {
    if value <= 0 {
        return Err(format!("{} must be a positive id", field));
    }
    Ok(())
}

fn username(value: &str) -> Result<(), String> {
    non_blank("username", value)?;
    if value.chars().count() > MAX_USERNAME_LEN {
        return Err(format!("username must be at most {} characters", MAX_USERNAME_LEN));
    }
    Ok(())
}

fn email(value: &str) -> Result<(), String> {
    non_blank("email", value)?;
    match value.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err("email must look like name@domain".to_string()),
    }
}

impl Validate for CreateUserRequest {
    fn validate(&self) -> Result<(), String> {
        username(&self.username)?;
        email(&self.email)?;
        non_blank("password", &self.password)
    }
}

impl Validate for UpdateUserRequest {
    fn validate(&self) -> Result<(), String> {
        if let Some(name) = &self.username {
            username(name)?;
        }
        if let Some(addr) = &self.email {
            email(addr)?;
        }
        if let Some(password) = &self.password {
            non_blank("password", password)?;
        }
        Ok(())
    }
}

impl Validate for CreatePostRequest {
    fn validate(&self) -> Result<(), String> {
        non_blank("title", &self.title)?;
        non_blank("content", &self.content)?;
        positive_id("author_id", self.author_id)
    }
}

impl Validate for UpdatePostRequest {
    fn validate(&self) -> Result<(), String> {
        if let Some(title) = &self.title {
            non_blank("title", title)?;
        }
        if let Some(content) = &self.content {
            non_blank("content", content)?;
        }
        Ok(())
    }
}

impl Validate for CreateCommentRequest {
    fn validate(&self) -> Result<(), String> {
        non_blank("content", &self.content)?;
        positive_id("author_id", self.author_id)
    }
}

impl Validate for UpdateCommentRequest {
    fn validate(&self) -> Result<(), String> {
        match &self.content {
            Some(content) => non_blank("content", content),
            None => Ok(()),
        }
    }
}

impl Validate for CreatePingPongRequest {
    fn validate(&self) -> Result<(), String> {
        non_blank("title", &self.title)?;
        positive_id("requester_id", self.requester_id)?;
        positive_id("responder_id", self.responder_id)
    }
}

impl Validate for UpdatePingPongRequest {
    fn validate(&self) -> Result<(), String> {
        if let Some(title) = &self.title {
            non_blank("title", title)?;
        }
        Ok(())
    }
}

impl Validate for CreateMessageRequest {
    fn validate(&self) -> Result<(), String> {
        positive_id("sender_id", self.sender_id)?;
        non_blank("content", &self.content)
    }
}

impl Validate for CreateMetadataRequest {
    fn validate(&self) -> Result<(), String> {
        positive_id("user_id", self.user_id)?;
        non_blank("name", &self.name)
    }
}

impl Validate for UpdateMetadataRequest {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(username: &str, email: &str) -> CreateUserRequest {
        CreateUserRequest {
            username: username.into(),
            email: email.into(),
            password: "secret".into(),
            avatar: None,
        }
    }

    #[test]
    fn accepts_well_formed_user() {
        assert!(user("alice", "alice@example.com").validate().is_ok());
    }

    #[test]
    fn rejects_blank_username_and_bad_email() {
        assert_eq!(
            user("   ", "alice@example.com").validate().unwrap_err(),
            "username must not be empty"
        );
        assert!(user("alice", "alice.example.com").validate().is_err());
        assert!(user("alice", "@example.com").validate().is_err());
        assert!(user(&"x".repeat(65), "a@b").validate().is_err());
    }

    #[test]
    fn rejects_non_positive_ids() {
        let req = CreatePostRequest {
            title: "hello".into(),
            content: "world".into(),
            author_id: 0,
            published: false,
        };
        assert_eq!(req.validate().unwrap_err(), "author_id must be a positive id");
    }

    #[test]
    fn empty_update_is_fine() {
        assert!(UpdateUserRequest::default().validate().is_ok());
        assert!(UpdatePingPongRequest::default().validate().is_ok());
    }
}
