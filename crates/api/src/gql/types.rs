use async_graphql::{Enum, InputObject, OutputType, SimpleObject};
use infra::pagination::LimitOffset;

pub use crate::gql::domains::activity_log::types::{ActivityEventCategory, ActivityLogEntry};
pub use crate::gql::domains::auth::types::AuthPayload;
pub use crate::gql::domains::bookings::types::{
    BookClassInput, BookClassPayload, Booking, BookingStatus, CancelBookingPayload, PaymentMethod,
    Refund,
};
pub use crate::gql::domains::calendar::types::{AdminCalendar, CalendarEntry, CalendarLane};
pub use crate::gql::domains::classes::types::{
    CourtAssignmentOutcome, CourtAssignmentResult, Modality, ProposeClassInput, RecyclingInfo,
    SlotEventType, SlotStatus, SlotUpdateEvent, TimeSlot,
};
pub use crate::gql::domains::clubs::types::{Club, Court};
pub use crate::gql::domains::users::types::{User, UserNotification};

const MAX_PAGE_SIZE: i32 = 200;

#[derive(Enum, Copy, Clone, Eq, PartialEq, Debug, serde::Serialize, serde::Deserialize)]
pub enum Role {
    #[graphql(name = "ADMIN")]
    Admin,
    #[graphql(name = "INSTRUCTOR")]
    Instructor,
    #[graphql(name = "PLAYER")]
    Player,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Instructor => "instructor",
            Role::Player => "player",
        }
    }
}

impl From<String> for Role {
    fn from(role: String) -> Self {
        match role.as_str() {
            "admin" => Role::Admin,
            "instructor" => Role::Instructor,
            _ => Role::Player,
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

#[derive(InputObject, Clone, Debug, Default)]
pub struct PaginationInput {
    pub limit: Option<i32>,
    pub offset: Option<i32>,
}

impl PaginationInput {
    pub fn to_limit_offset(&self) -> LimitOffset {
        let defaults = LimitOffset::default();
        LimitOffset {
            limit: self
                .limit
                .map(|l| i64::from(l.clamp(1, MAX_PAGE_SIZE)))
                .unwrap_or(defaults.limit),
            offset: self
                .offset
                .map(|o| i64::from(o.max(0)))
                .unwrap_or(defaults.offset),
        }
    }
}

#[derive(SimpleObject)]
#[graphql(concrete(name = "PaginatedActivityLog", params(ActivityLogEntry)))]
#[graphql(concrete(name = "PaginatedUsers", params(User)))]
pub struct PaginatedResponse<T: OutputType> {
    pub items: Vec<T>,
    pub total_count: i32,
    pub page_size: i32,
    pub offset: i32,
    pub has_next_page: bool,
}

impl<T: OutputType> PaginatedResponse<T> {
    /// Wraps one page of `items` fetched at `page`, out of `total_count`.
    pub fn new(items: Vec<T>, page: LimitOffset, total_count: i64) -> Self {
        let page_size = items.len() as i32;
        let offset = page.offset as i32;
        Self {
            has_next_page: i64::from(offset + page_size) < total_count,
            items,
            total_count: total_count as i32,
            page_size,
            offset,
        }
    }
}
