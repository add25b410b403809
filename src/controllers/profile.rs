// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::info;

use crate::errors::DietResult;
use crate::intelligence::{streak_days, streak_progress, BmiResult};
use crate::logging::AppLogger;
use crate::models::{PersonalInfo, Profile, ProfileExport, ProfileGoals, SettingKey};
use crate::storage::{load_typed, remove_all, save_typed, StateStore, StorageSlot};
use crate::validation::{validate_personal_info, validate_profile_goals};

/// Derived values shown on the profile page
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSummary {
    pub bmi: Option<BmiResult>,
    pub daily_calories: u32,
    pub current_weight: Option<f64>,
    pub target_weight: Option<f64>,
    pub weight_progress: Option<f64>,
    pub streak_days: u32,
    pub streak_progress: f64,
}

/// Personal info, lifestyle goals and settings
pub struct ProfileManager {
    store: Arc<dyn StateStore>,
    profile: RwLock<Profile>,
}

impl ProfileManager {
    pub async fn load(store: Arc<dyn StateStore>) -> DietResult<Self> {
        let profile = load_typed(store.as_ref(), StorageSlot::Profile)
            .await?
            .unwrap_or_default();

        Ok(Self {
            store,
            profile: RwLock::new(profile),
        })
    }

    pub async fn profile(&self) -> Profile {
        self.profile.read().await.clone()
    }

    pub async fn update_personal_info(&self, info: PersonalInfo) -> DietResult<Profile> {
        if let Err(e) = validate_personal_info(&info) {
            AppLogger::log_validation_failure("personal_info", &e.to_string());
            return Err(e.into());
        }
        self.update(|profile| profile.personal_info = info).await
    }

    pub async fn update_goals(&self, goals: ProfileGoals) -> DietResult<Profile> {
        if let Err(e) = validate_profile_goals(&goals) {
            AppLogger::log_validation_failure("profile_goals", &e.to_string());
            return Err(e.into());
        }
        self.update(|profile| profile.goals = goals).await
    }

    /// Toggle a setting; dark mode also updates the `theme` slot
    pub async fn update_setting(&self, key: SettingKey, value: bool) -> DietResult<Profile> {
        let profile = self.update(|profile| profile.settings.set(key, value)).await?;

        if key == SettingKey::DarkMode {
            let theme = if value { "dark" } else { "light" };
            save_typed(self.store.as_ref(), StorageSlot::Theme, theme).await?;
        }

        Ok(profile)
    }

    /// Stored theme, `"light"` when never set
    pub async fn theme(&self) -> DietResult<String> {
        let theme: Option<String> = load_typed(self.store.as_ref(), StorageSlot::Theme).await?;
        Ok(theme.unwrap_or_else(|| "light".to_string()))
    }

    pub async fn summary(&self, now: DateTime<Utc>) -> DietResult<ProfileSummary> {
        let last_logged: Option<DateTime<Utc>> =
            load_typed(self.store.as_ref(), StorageSlot::LastMealLogged).await?;
        let streak = streak_days(last_logged, now);

        let profile = self.profile.read().await;
        Ok(ProfileSummary {
            bmi: profile.bmi(),
            daily_calories: profile.daily_calorie_target(),
            current_weight: profile.personal_info.weight,
            target_weight: profile.target_weight(),
            weight_progress: profile.weight_progress(),
            streak_days: streak,
            streak_progress: streak_progress(streak),
        })
    }

    pub async fn export(&self, now: DateTime<Utc>) -> ProfileExport {
        ProfileExport {
            profile: self.profile().await,
            export_date: now,
        }
    }

    /// Write the export as pretty JSON into `dir`, returning the file path
    pub async fn export_to_dir(&self, dir: &Path, now: DateTime<Utc>) -> DietResult<PathBuf> {
        let export = self.export(now).await;
        let path = dir.join(export.file_name());

        let content = serde_json::to_string_pretty(&export)?;
        tokio::fs::create_dir_all(dir).await?;
        tokio::fs::write(&path, content).await?;

        info!(path = %path.display(), "Profile data exported");
        Ok(path)
    }

    /// Remove profile, nutrition log and meal plan preferences
    pub async fn clear_all(&self) -> DietResult<()> {
        remove_all(
            self.store.as_ref(),
            &[
                StorageSlot::Profile,
                StorageSlot::Nutrition,
                StorageSlot::MealPlanPreferences,
            ],
        )
        .await?;

        *self.profile.write().await = Profile::default();
        info!("All stored data cleared");
        Ok(())
    }

    async fn update<F>(&self, apply: F) -> DietResult<Profile>
    where
        F: FnOnce(&mut Profile),
    {
        let mut current = self.profile.write().await;
        let mut next = current.clone();
        apply(&mut next);

        save_typed(self.store.as_ref(), StorageSlot::Profile, &next).await?;
        *current = next.clone();
        Ok(next)
    }
}
