//! Row types mirroring the platform's tables.
//!
//! Timestamps stay RFC 3339 strings exactly as the data API returns them;
//! nothing here is interpreted locally.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// One row of the `profiles` table; exactly one per account.
#[derive(ToSchema, Serialize, Deserialize, Clone, Debug)]
pub struct Profile {
    pub id: Uuid,
    pub email: String,
    pub phone: Option<String>,
    pub full_name: String,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub college: Option<String>,
    pub university: Option<String>,
    pub course: Option<String>,
    pub year_of_study: Option<u8>,
    pub subjects: Option<Vec<String>>,
    pub interests: Option<Vec<String>>,
    pub is_verified: bool,
    pub rating: f64,
    pub total_reviews: u32,
    pub study_streak: u32,
    pub last_active: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Insert shape for the `profiles` table, keyed by the new account id.
#[derive(ToSchema, Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct NewProfile {
    pub id: Uuid,
    pub email: String,
    pub phone: Option<String>,
    pub full_name: String,
    pub college: Option<String>,
    pub university: Option<String>,
    pub course: Option<String>,
    pub year_of_study: Option<u8>,
    pub subjects: Vec<String>,
}

#[derive(ToSchema, Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RoomType {
    Video,
    Audio,
    Chat,
}

#[derive(ToSchema, Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    Scheduled,
    Active,
    Completed,
    Cancelled,
}

/// One row of the `study_rooms` table.
#[derive(ToSchema, Serialize, Deserialize, Clone, Debug)]
pub struct StudyRoom {
    pub id: Uuid,
    pub host_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub subject: String,
    pub scheduled_at: String,
    pub duration_minutes: u32,
    pub max_participants: u32,
    pub is_public: bool,
    pub room_type: RoomType,
    pub status: RoomStatus,
    pub recording_enabled: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// One row of the `notes` table.
#[derive(ToSchema, Serialize, Deserialize, Clone, Debug)]
pub struct Note {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub subject: Option<String>,
    pub tags: Option<Vec<String>>,
    pub is_public: bool,
    pub is_paid: bool,
    pub price: Option<f64>,
    pub file_url: Option<String>,
    pub file_type: Option<String>,
    pub downloads: u32,
    pub rating: f64,
    pub total_reviews: u32,
    pub created_at: String,
    pub updated_at: String,
}
