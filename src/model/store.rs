//! Read-only collaborator interfaces the pipeline consumes.
//!
//! The render entry point receives these as explicit handles; nothing in the crate reaches for a
//! shared global client.

use std::{collections::HashMap, path::Path};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::{
    foundation::error::{RenderError, RenderResult},
    model::domain::{Agent, BrandingProfile, Project},
};

/// Project documents with their ordered photos.
pub trait ProjectStore: Send + Sync {
    /// Fetch a project owned by `owner_id`.
    fn get_project(&self, project_id: &str, owner_id: &str) -> RenderResult<Project>;
}

/// User subscription and branding documents.
pub trait AccountStore: Send + Sync {
    /// Name of the user's current subscription plan (may be `free`/`trial`/unknown).
    fn plan_name(&self, user_id: &str) -> RenderResult<String>;
    /// Branding profile; implementations return a neutral profile when none exists yet.
    fn branding(&self, user_id: &str) -> RenderResult<BrandingProfile>;
}

/// Agent contact documents.
pub trait AgentStore: Send + Sync {
    /// Fetch an agent owned by `owner_id`, `None` when it does not exist.
    fn get_agent(&self, agent_id: &str, owner_id: &str) -> RenderResult<Option<Agent>>;
}

/// Bundle of collaborator handles passed into a render.
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    pub projects: &'a dyn ProjectStore,
    pub accounts: &'a dyn AccountStore,
    pub agents: &'a dyn AgentStore,
}

impl<'a> Collaborators<'a> {
    /// Use one value for all three roles.
    pub fn from_one<S>(store: &'a S) -> Self
    where
        S: ProjectStore + AccountStore + AgentStore,
    {
        Self {
            projects: store,
            accounts: store,
            agents: store,
        }
    }
}

/// A user record as far as rendering is concerned.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: String,
    #[serde(default = "default_plan")]
    pub plan: String,
    #[serde(default)]
    pub branding: Option<BrandingProfile>,
}

fn default_plan() -> String {
    "free".to_string()
}

/// Map-backed implementation of every collaborator trait.
///
/// Used by tests and by the CLI, which loads it from a JSON fixture. Records are only added
/// through the builder methods so the lookup index always matches them.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct InMemoryStore {
    #[serde(default)]
    users: Vec<UserAccount>,
    #[serde(default)]
    projects: Vec<Project>,
    #[serde(default)]
    agents: Vec<Agent>,
    #[serde(skip)]
    index: Option<Index>,
}

#[derive(Clone, Debug, Default)]
struct Index {
    users: HashMap<String, usize>,
    projects: HashMap<String, usize>,
    agents: HashMap<String, usize>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a fixture document (`{"users": [...], "projects": [...], "agents": [...]}`).
    pub fn from_json_file(path: &Path) -> RenderResult<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read fixture '{}'", path.display()))?;
        let mut store: Self = serde_json::from_slice(&bytes)
            .map_err(|e| RenderError::validation(format!("invalid fixture JSON: {e}")))?;
        store.reindex();
        Ok(store)
    }

    pub fn with_user(mut self, user: UserAccount) -> Self {
        self.users.push(user);
        self.reindex();
        self
    }

    pub fn with_project(mut self, project: Project) -> Self {
        self.projects.push(project);
        self.reindex();
        self
    }

    pub fn with_agent(mut self, agent: Agent) -> Self {
        self.agents.push(agent);
        self.reindex();
        self
    }

    pub fn users(&self) -> &[UserAccount] {
        &self.users
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    fn reindex(&mut self) {
        fn build<T>(items: &[T], key: impl Fn(&T) -> &str) -> HashMap<String, usize> {
            items
                .iter()
                .enumerate()
                .map(|(i, item)| (key(item).to_string(), i))
                .collect()
        }
        self.index = Some(Index {
            users: build(&self.users, |u| &u.id),
            projects: build(&self.projects, |p| &p.id),
            agents: build(&self.agents, |a| &a.id),
        });
    }

    fn user(&self, user_id: &str) -> RenderResult<&UserAccount> {
        let found = match &self.index {
            Some(index) => index.users.get(user_id).and_then(|&i| self.users.get(i)),
            None => self.users.iter().find(|u| u.id == user_id),
        };
        found.ok_or_else(|| RenderError::not_found(format!("user '{user_id}' not found")))
    }
}

impl ProjectStore for InMemoryStore {
    fn get_project(&self, project_id: &str, owner_id: &str) -> RenderResult<Project> {
        let found = match &self.index {
            Some(index) => index.projects.get(project_id).and_then(|&i| self.projects.get(i)),
            None => self.projects.iter().find(|p| p.id == project_id),
        };
        found
            .filter(|p| p.owner_id == owner_id)
            .cloned()
            .ok_or_else(|| RenderError::not_found(format!("project '{project_id}' not found")))
    }
}

impl AccountStore for InMemoryStore {
    fn plan_name(&self, user_id: &str) -> RenderResult<String> {
        Ok(self.user(user_id)?.plan.clone())
    }

    fn branding(&self, user_id: &str) -> RenderResult<BrandingProfile> {
        let user = self.user(user_id)?;
        Ok(user
            .branding
            .clone()
            .unwrap_or_else(|| BrandingProfile::neutral(user_id)))
    }
}

impl AgentStore for InMemoryStore {
    fn get_agent(&self, agent_id: &str, owner_id: &str) -> RenderResult<Option<Agent>> {
        let found = match &self.index {
            Some(index) => index.agents.get(agent_id).and_then(|&i| self.agents.get(i)),
            None => self.agents.iter().find(|a| a.id == agent_id),
        };
        Ok(found.filter(|a| a.owner_id == owner_id).cloned())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/store.rs"]
mod tests;
