use crate::error::{EditorError, Result};
use crate::project::{AspectRatio, Project, ProjectId, UNTITLED_PROJECT};
use chrono::Utc;
use uuid::Uuid;

/// In-memory project list. Nothing here survives a restart.
#[derive(Debug, Clone)]
pub struct ProjectStore {
    projects: Vec<Project>,
}

impl ProjectStore {
    pub fn new() -> Self {
        Self {
            projects: vec![Project::default()],
        }
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn get(&self, id: ProjectId) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    fn get_mut(&mut self, id: ProjectId) -> Result<&mut Project> {
        self.projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(EditorError::ProjectNotFound)
    }

    /// Always present: the store never becomes empty
    pub fn first(&self) -> &Project {
        &self.projects[0]
    }

    pub fn create(&mut self, name: &str, aspect_ratio: AspectRatio) -> ProjectId {
        let project = Project::new(name, aspect_ratio);
        let id = project.id;
        self.projects.push(project);
        id
    }

    pub fn rename(&mut self, id: ProjectId, name: &str) -> Result<()> {
        self.get_mut(id)?.rename(name);
        Ok(())
    }

    pub fn duplicate(&mut self, id: ProjectId) -> Result<ProjectId> {
        let source = self.get(id).ok_or(EditorError::ProjectNotFound)?;
        let now = Utc::now();
        let copy = Project {
            id: Uuid::new_v4(),
            name: format!("{} (copy)", source.name),
            created_at: now,
            modified_at: now,
            ..source.clone()
        };
        let copy_id = copy.id;
        self.projects.push(copy);
        Ok(copy_id)
    }

    /// Remove a project. Deleting the last one leaves a fresh untitled project.
    pub fn delete(&mut self, id: ProjectId) -> Result<()> {
        let index = self
            .projects
            .iter()
            .position(|p| p.id == id)
            .ok_or(EditorError::ProjectNotFound)?;
        self.projects.remove(index);
        if self.projects.is_empty() {
            self.projects.push(Project::new(UNTITLED_PROJECT, AspectRatio::default()));
        }
        Ok(())
    }

    /// Commit a working copy, inserting it if it was deleted meanwhile
    pub fn save(&mut self, project: &Project) {
        match self.projects.iter_mut().find(|p| p.id == project.id) {
            Some(slot) => *slot = project.clone(),
            None => self.projects.push(project.clone()),
        }
    }

    pub fn is_saved(&self, project: &Project) -> bool {
        self.get(project.id) == Some(project)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.projects.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}

impl Default for ProjectStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::MediaAsset;

    #[test]
    fn test_create_rename_delete() {
        let mut store = ProjectStore::new();
        let id = store.create("Promo", AspectRatio::Portrait9x16);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(id).unwrap().aspect_ratio, AspectRatio::Portrait9x16);

        store.rename(id, "Launch promo").unwrap();
        assert_eq!(store.get(id).unwrap().name, "Launch promo");

        store.delete(id).unwrap();
        assert!(store.get(id).is_none());
        assert!(matches!(store.delete(id), Err(EditorError::ProjectNotFound)));
    }

    #[test]
    fn test_deleting_last_project_leaves_untitled() {
        let mut store = ProjectStore::new();
        let only = store.first().id;
        store.delete(only).unwrap();
        assert_eq!(store.len(), 1);
        assert_ne!(store.first().id, only);
        assert_eq!(store.first().name, UNTITLED_PROJECT);
    }

    #[test]
    fn test_duplicate_copies_clip() {
        let mut store = ProjectStore::new();
        let mut working = store.first().clone();
        working
            .place_asset(&MediaAsset::test_asset("a.mp4", 8.0))
            .unwrap();
        store.save(&working);

        let copy_id = store.duplicate(working.id).unwrap();
        let copy = store.get(copy_id).unwrap();
        assert_eq!(copy.name, format!("{} (copy)", working.name));
        assert_eq!(copy.clip, working.clip);
        assert_ne!(copy.id, working.id);
    }

    #[test]
    fn test_save_tracks_dirty_state() {
        let mut store = ProjectStore::new();
        let mut working = store.first().clone();
        assert!(store.is_saved(&working));

        working.set_aspect_ratio(AspectRatio::Square);
        assert!(!store.is_saved(&working));

        store.save(&working);
        assert!(store.is_saved(&working));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_save_reinserts_deleted_project() {
        let mut store = ProjectStore::new();
        let working = store.first().clone();
        store.create("Other", AspectRatio::Square);
        store.delete(working.id).unwrap();
        store.save(&working);
        assert!(store.get(working.id).is_some());
    }
}
