//! Active pushes rendered as JSON request bodies

use crate::payload::Payload;
use crate::{MessageError, Result};
use serde_json::{Map, Value};

/// Maximum number of user ids in one push
pub const MAX_USERS: usize = 1000;
/// Maximum number of department ids in one push
pub const MAX_PARTIES: usize = 100;

/// Who receives an active push
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Recipients {
    to_all: bool,
    users: Vec<String>,
    parties: Vec<String>,
    tags: Vec<String>,
}

impl Recipients {
    /// No recipients yet; add them with [`users`](Self::users) and friends
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everyone visible to the agent
    #[must_use]
    pub fn all() -> Self {
        Self {
            to_all: true,
            ..Self::default()
        }
    }

    /// Add user ids
    #[must_use]
    pub fn users<I, S>(mut self, users: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.users.extend(users.into_iter().map(Into::into));
        self
    }

    /// Add department ids
    #[must_use]
    pub fn parties<I, S>(mut self, parties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parties.extend(parties.into_iter().map(Into::into));
        self
    }

    /// Add tag ids
    #[must_use]
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Whether this addresses everyone
    #[must_use]
    pub fn is_all(&self) -> bool {
        self.to_all
    }

    fn check_limits(&self) -> Result<()> {
        if self.to_all {
            return Ok(());
        }
        if self.users.len() > MAX_USERS {
            return Err(MessageError::construction(format!(
                "cannot send to more than {MAX_USERS} users"
            )));
        }
        if self.parties.len() > MAX_PARTIES {
            return Err(MessageError::construction(format!(
                "cannot send to more than {MAX_PARTIES} parties"
            )));
        }
        Ok(())
    }

    fn write_into(&self, body: &mut Map<String, Value>) {
        if self.to_all {
            body.insert("touser".into(), Value::from("@all"));
            return;
        }
        body.insert("touser".into(), Value::from(self.users.join("|")));
        body.insert("toparty".into(), Value::from(self.parties.join("|")));
        body.insert("totag".into(), Value::from(self.tags.join("|")));
    }
}

/// Builds the JSON body of an active push for one agent
#[derive(Debug, Clone)]
pub struct SendBuilder {
    agent_id: i64,
    recipients: Recipients,
    safe: bool,
}

impl SendBuilder {
    /// Address a push from `agent_id`
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::Construction`] for more than [`MAX_USERS`] users
    /// or more than [`MAX_PARTIES`] parties.
    pub fn new(agent_id: i64, recipients: Recipients) -> Result<Self> {
        recipients.check_limits()?;
        Ok(Self {
            agent_id,
            recipients,
            safe: false,
        })
    }

    /// Mark the push as confidential
    #[must_use]
    pub fn safe(mut self, safe: bool) -> Self {
        self.safe = safe;
        self
    }

    /// Agent the push is sent from
    #[must_use]
    pub fn agent_id(&self) -> i64 {
        self.agent_id
    }

    /// Produce the request body for `payload`
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::Construction`] if a required field is missing.
    pub fn apply(&self, payload: &Payload) -> Result<Value> {
        payload.validate()?;
        let msg_type = payload.msg_type();

        let mut body = Map::new();
        body.insert("msgtype".into(), Value::from(msg_type));
        body.insert("agentid".into(), Value::from(self.agent_id));
        body.insert(msg_type.into(), payload.to_json());
        self.recipients.write_into(&mut body);
        body.insert("safe".into(), Value::from(if self.safe { "1" } else { "0" }));

        log::debug!("Built {msg_type} push for agent {}", self.agent_id);
        Ok(Value::Object(body))
    }
}
