use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;
use shared::protocol::{FlagUpdate, Resource, StatusFlag};

use crate::{backend::AdminBackend, error::ConsoleError};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    GetAll(&'static str),
    GetOne(&'static str, String),
    Create(&'static str, Value),
    Update(&'static str, Value),
    Delete(&'static str, String),
    SetFlag(&'static str, StatusFlag, FlagUpdate),
}

impl Call {
    pub fn is_write(&self) -> bool {
        !matches!(self, Call::GetAll(_) | Call::GetOne(..))
    }
}

/// In-memory backend that records every call it receives.
pub struct RecordingBackend {
    list: Value,
    record: Value,
    read_failure: Option<(u16, String)>,
    write_failure: Option<(u16, String)>,
    calls: Mutex<Vec<Call>>,
}

impl RecordingBackend {
    pub fn new(list: Value, record: Value) -> Self {
        Self {
            list,
            record,
            read_failure: None,
            write_failure: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_record(record: Value) -> Self {
        Self::new(Value::Array(Vec::new()), record)
    }

    pub fn with_list(list: Value) -> Self {
        Self::new(list, Value::Null)
    }

    pub fn failing_reads(mut self, status: u16, message: &str) -> Self {
        self.read_failure = Some((status, message.to_string()));
        self
    }

    pub fn failing_writes(mut self, status: u16, message: &str) -> Self {
        self.write_failure = Some((status, message.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub fn writes(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_write).collect()
    }

    fn record_call(&self, call: Call) {
        self.calls.lock().expect("calls lock").push(call);
    }

    fn read(&self, value: &Value) -> Result<Value, ConsoleError> {
        match &self.read_failure {
            Some((status, message)) => Err(ConsoleError::Server {
                status: *status,
                message: message.clone(),
            }),
            None => Ok(value.clone()),
        }
    }

    fn write(&self) -> Result<Value, ConsoleError> {
        match &self.write_failure {
            Some((status, message)) => Err(ConsoleError::Server {
                status: *status,
                message: message.clone(),
            }),
            None => Ok(serde_json::json!({ "success": true })),
        }
    }
}

#[async_trait]
impl AdminBackend for RecordingBackend {
    async fn get_all(&self, resource: Resource) -> Result<Value, ConsoleError> {
        self.record_call(Call::GetAll(resource.segment));
        self.read(&self.list)
    }

    async fn get_one(&self, resource: Resource, id: &str) -> Result<Value, ConsoleError> {
        self.record_call(Call::GetOne(resource.segment, id.to_string()));
        self.read(&self.record)
    }

    async fn create(&self, resource: Resource, body: &Value) -> Result<Value, ConsoleError> {
        self.record_call(Call::Create(resource.segment, body.clone()));
        self.write()
    }

    async fn update(&self, resource: Resource, body: &Value) -> Result<Value, ConsoleError> {
        self.record_call(Call::Update(resource.segment, body.clone()));
        self.write()
    }

    async fn delete(&self, resource: Resource, id: &str) -> Result<Value, ConsoleError> {
        self.record_call(Call::Delete(resource.segment, id.to_string()));
        self.write()
    }

    async fn set_flag(
        &self,
        resource: Resource,
        flag: StatusFlag,
        update: &FlagUpdate,
    ) -> Result<Value, ConsoleError> {
        self.record_call(Call::SetFlag(resource.segment, flag, update.clone()));
        self.write()
    }
}
