use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;
use tokio::sync::RwLock;

use crate::{
    bridge::Lisp2Scs,
    event::TranslationEvent,
    importer::ValidationReport,
    model::{ShowModel, record::UuidCueFactory},
};

#[derive(Clone)]
pub struct ShowModelManager {
    state: Arc<RwLock<ShowModel>>,
    bridge: Arc<Lisp2Scs>,
}

impl Default for ShowModelManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ShowModelManager {
    pub fn new() -> Self {
        Self::with_bridge(Arc::new(Lisp2Scs::new()))
    }

    pub fn with_bridge(bridge: Arc<Lisp2Scs>) -> Self {
        Self {
            state: Arc::new(RwLock::new(ShowModel::default())),
            bridge,
        }
    }

    pub async fn read(&self) -> tokio::sync::RwLockReadGuard<'_, ShowModel> {
        self.state.read().await
    }

    pub async fn write_with<F, R>(&self, updater: F) -> R
    where
        F: FnOnce(&mut ShowModel) -> R,
    {
        let mut guard = self.state.write().await;
        updater(&mut guard)
    }

    pub async fn load_from_file(&self, path: &Path) -> Result<(), anyhow::Error> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let new_model: ShowModel = tokio::task::spawn_blocking(move || serde_json::from_str(&content)).await??;

        self.write_with(|state| {
            *state = new_model;
        })
        .await;

        log::info!("Show loaded from: {}", path.display());
        Ok(())
    }

    pub async fn save_to_file(&self, path: &Path) -> Result<(), anyhow::Error> {
        let model_clone = self.read().await.clone();

        let content = tokio::task::spawn_blocking(move || serde_json::to_string_pretty(&model_clone)).await??;

        tokio::fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        log::info!("Show saved to: {}", path.display());
        Ok(())
    }

    pub async fn export_scs_file(&self, path: &Path) -> Result<Vec<TranslationEvent>, anyhow::Error> {
        let model_clone = self.read().await.clone();
        let session_dir = parent_dir(path);
        let bridge = self.bridge.clone();

        let (content, warnings) = tokio::task::spawn_blocking(move || {
            let report = bridge.export_show(&model_clone, &session_dir);
            report
                .document
                .to_xml_string()
                .map(|content| (content, report.warnings))
        })
        .await??;

        tokio::fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        log::info!("Show exported to: {}", path.display());
        Ok(warnings)
    }

    pub async fn validate_scs_file(&self, path: &Path) -> Result<ValidationReport, anyhow::Error> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let settings = self.read().await.settings.clone();
        let bridge = self.bridge.clone();

        let report = tokio::task::spawn_blocking(move || bridge.validate_file(&content, &settings)).await??;
        Ok(report)
    }

    // Write lock spans snapshot to assignment. The show is untouched on error.
    pub async fn import_scs_file(&self, path: &Path, base: Option<&Path>) -> Result<Vec<TranslationEvent>, anyhow::Error> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let base = base.map(Path::to_path_buf).unwrap_or_else(|| parent_dir(path));
        let bridge = self.bridge.clone();

        let mut guard = self.state.write().await;
        let model_clone = guard.clone();
        let (new_model, report) = tokio::task::spawn_blocking(move || {
            let mut model = model_clone;
            bridge
                .import_file(&content, &base, &mut model, &UuidCueFactory)
                .map(|report| (model, report))
        })
        .await??;
        *guard = new_model;
        drop(guard);

        log::info!("Imported {} cues from: {}", report.imported, path.display());
        Ok(report.warnings)
    }
}

fn parent_dir(path: &Path) -> PathBuf {
    path.parent().map(Path::to_path_buf).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::ScsError,
        exporter::tests::{media_cue, midi_cue},
        model::cue::{CueParam, SinkKind},
    };

    #[tokio::test]
    async fn show_survives_json_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("show.json");

        let manager = ShowModelManager::new();
        manager
            .write_with(|model| {
                model.name = "Tempest".to_string();
                model.cues.push(midi_cue("Go", "note_on channel=0 note=1 velocity=1"));
            })
            .await;
        manager.save_to_file(&path).await.unwrap();

        let loaded = ShowModelManager::new();
        loaded.load_from_file(&path).await.unwrap();
        assert_eq!(*loaded.read().await, *manager.read().await);
    }

    #[tokio::test]
    async fn scs_files_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let audio = dir.path().join("audio").join("wind.ogg");
        let production = dir.path().join("tempest.scs11");

        let manager = ShowModelManager::new();
        manager
            .write_with(|model| {
                model.name = "Tempest".to_string();
                model
                    .cues
                    .push(media_cue("Wind", &audio.to_string_lossy(), Some(SinkKind::Auto)));
            })
            .await;
        let warnings = manager.export_scs_file(&production).await.unwrap();
        assert!(warnings.is_empty());

        let xml = tokio::fs::read_to_string(&production).await.unwrap();
        assert!(xml.contains("<FileName>$(Cue)\\audio\\wind.ogg</FileName>"));

        let validation = manager.validate_scs_file(&production).await.unwrap();
        assert!(validation.is_valid());

        let imported = ShowModelManager::new();
        imported.import_scs_file(&production, None).await.unwrap();
        let model = imported.read().await;
        assert_eq!(model.name, "Tempest");
        assert_eq!(model.cues.len(), 1);
        let CueParam::Media { media, .. } = &model.cues[0].param else {
            panic!("not a media cue");
        };
        assert_eq!(
            media.elements.uri_input.as_ref().unwrap().uri,
            format!("file://{}", audio.to_string_lossy())
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn concurrent_edits_survive_import() {
        let dir = tempfile::tempdir().unwrap();
        let audio = dir.path().join("rain.wav");
        let production = dir.path().join("storm.scs11");

        let source = ShowModelManager::new();
        source
            .write_with(|model| {
                for idx in 0..50 {
                    model
                        .cues
                        .push(media_cue(&format!("Rain {}", idx), &audio.to_string_lossy(), Some(SinkKind::Auto)));
                }
            })
            .await;
        source.export_scs_file(&production).await.unwrap();

        for _ in 0..20 {
            let manager = ShowModelManager::new();
            let editor = manager.clone();
            let edit = tokio::spawn(async move {
                tokio::task::yield_now().await;
                editor
                    .write_with(|model| model.cues.push(midi_cue("Cue light", "note_on channel=0 note=1 velocity=1")))
                    .await;
            });
            manager.import_scs_file(&production, None).await.unwrap();
            edit.await.unwrap();

            let model = manager.read().await;
            assert_eq!(model.cues.len(), 51);
            assert!(model.cues.iter().any(|cue| cue.name == "Cue light"));
        }
    }

    #[tokio::test]
    async fn failed_import_leaves_show_alone() {
        let dir = tempfile::tempdir().unwrap();
        let production = dir.path().join("broken.scs11");
        tokio::fs::write(&production, "<Production><Cue><Sub><SubType>K</SubType></Sub></Cue></Production>")
            .await
            .unwrap();

        let manager = ShowModelManager::new();
        manager
            .write_with(|model| model.name = "Untouched".to_string())
            .await;
        let err = manager.import_scs_file(&production, None).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ScsError>(),
            Some(ScsError::InvalidDocument(_))
        ));
        assert_eq!(manager.read().await.name, "Untouched");
        assert!(manager.read().await.cues.is_empty());
    }
}
