//! Session driver — executes the machine's effects against the external
//! services and hosts one workflow instance per session id.
//!
//! The machine lock is held only while a transition is applied, never across
//! a network await. A completion is applied under a fresh lock with the
//! epoch its effect carried, so a response superseded by a newer selection
//! is discarded by the machine instead of racing it.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::clients::parse::ParseService;
use crate::clients::store::ResumeStore;
use crate::models::upload::SelectedFile;
use crate::profile::models::ProfileField;
use crate::workflow::machine::{Effect, UploadWorkflow, WorkflowError, WorkflowSnapshot};

pub struct WorkflowSession {
    machine: Mutex<UploadWorkflow>,
    parse: Arc<dyn ParseService>,
    store: Arc<dyn ResumeStore>,
}

impl WorkflowSession {
    pub fn new(parse: Arc<dyn ParseService>, store: Arc<dyn ResumeStore>) -> Self {
        Self {
            machine: Mutex::new(UploadWorkflow::new()),
            parse,
            store,
        }
    }

    pub async fn snapshot(&self) -> WorkflowSnapshot {
        self.machine.lock().await.snapshot()
    }

    pub async fn select_file(&self, file: SelectedFile) -> WorkflowSnapshot {
        let mut machine = self.machine.lock().await;
        machine.select_file(file);
        machine.snapshot()
    }

    /// Submits the selected file and drives the parse request to completion.
    pub async fn submit_upload(&self) -> Result<WorkflowSnapshot, WorkflowError> {
        let effect = self.machine.lock().await.submit_upload()?;
        if let Some(effect) = effect {
            self.run_effect(effect).await;
        }
        Ok(self.snapshot().await)
    }

    pub async fn edit_field(
        &self,
        field: ProfileField,
        value: &str,
    ) -> Result<WorkflowSnapshot, WorkflowError> {
        let mut machine = self.machine.lock().await;
        machine.edit_field(field, value)?;
        Ok(machine.snapshot())
    }

    pub async fn edit_skills(&self, text: &str) -> Result<WorkflowSnapshot, WorkflowError> {
        let mut machine = self.machine.lock().await;
        machine.edit_skills(text)?;
        Ok(machine.snapshot())
    }

    pub async fn edit_programming_languages(
        &self,
        text: &str,
    ) -> Result<WorkflowSnapshot, WorkflowError> {
        let mut machine = self.machine.lock().await;
        machine.edit_programming_languages(text)?;
        Ok(machine.snapshot())
    }

    /// Hands the corrected profile off and drives the persist request to
    /// completion.
    pub async fn submit_review(&self) -> Result<WorkflowSnapshot, WorkflowError> {
        let effect = self.machine.lock().await.submit_review()?;
        if let Some(effect) = effect {
            self.run_effect(effect).await;
        }
        Ok(self.snapshot().await)
    }

    pub async fn cancel_review(&self) -> WorkflowSnapshot {
        let mut machine = self.machine.lock().await;
        machine.cancel_review();
        machine.snapshot()
    }

    async fn run_effect(&self, effect: Effect) {
        match effect {
            Effect::Parse { epoch, file } => {
                let outcome = self.parse.parse(&file).await;
                self.machine.lock().await.complete_parse(epoch, outcome);
            }
            Effect::Persist { epoch, profile } => {
                let outcome = self.store.save(&profile).await;
                self.machine.lock().await.complete_save(epoch, outcome);
            }
        }
    }
}

/// Live workflow sessions keyed by id. Sessions are created on demand and
/// dropped when the client navigates away; nothing survives a restart.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    inner: Arc<RwLock<HashMap<Uuid, Arc<WorkflowSession>>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(
        &self,
        parse: Arc<dyn ParseService>,
        store: Arc<dyn ResumeStore>,
    ) -> (Uuid, Arc<WorkflowSession>) {
        let id = Uuid::new_v4();
        let session = Arc::new(WorkflowSession::new(parse, store));
        self.inner.write().await.insert(id, session.clone());
        (id, session)
    }

    pub async fn get(&self, id: Uuid) -> Option<Arc<WorkflowSession>> {
        self.inner.read().await.get(&id).cloned()
    }

    pub async fn remove(&self, id: Uuid) -> bool {
        self.inner.write().await.remove(&id).is_some()
    }
}
