/// All domain errors for Shopkeeper.
///
/// `Display` is written for operators (CLI output, logs). The dashboard and
/// the bot show `user_message()` instead.
#[derive(Debug, thiserror::Error)]
pub enum ShopkeeperError {
    #[error(
        "Shop #{id} not found\n\n  \
         Run 'shopkeeper shop list' to see existing shops."
    )]
    ShopNotFound { id: u64 },

    #[error(
        "Unknown shop type '{value}'\n\n  \
         Valid types: PLATINUM, GOLD, VIP"
    )]
    InvalidType { value: String },

    #[error(
        "Unknown mention field '{value}'\n\n  \
         Valid fields: mentionEveryone, mentionHere, mentionStores"
    )]
    InvalidField { value: String },

    #[error("Shop name must not be empty")]
    InvalidName,

    #[error("Mention amount must be at least 1")]
    InvalidAmount,

    #[error("Not enough {field} quota: {remaining} left, {requested} requested")]
    QuotaExceeded {
        field: String,
        remaining: u32,
        requested: u32,
    },

    #[error("Not signed in")]
    Unauthorized,

    #[error("Request signature verification failed")]
    InvalidSignature,

    #[error("{service} request failed: {reason}")]
    UpstreamFailure { service: String, reason: String },

    #[error("Invalid configuration: {detail}")]
    InvalidConfig { detail: String },

    #[error("Shop storage error: {detail}")]
    StorageError { detail: String },

    #[error("Audit log error: {detail}")]
    AuditError { detail: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ShopkeeperError {
    /// Short message for dashboard alerts and bot replies.
    pub fn user_message(&self) -> String {
        match self {
            Self::ShopNotFound { .. } => "❌ المتجر غير موجود".into(),
            Self::InvalidType { value } => format!("❌ فئة غير معروفة: {value}"),
            Self::InvalidField { value } => format!("❌ نوع منشن غير معروف: {value}"),
            Self::InvalidName => "❌ اكتب اسم المتجر".into(),
            Self::InvalidAmount => "❌ الكمية يجب أن تكون 1 على الأقل".into(),
            Self::QuotaExceeded { remaining, .. } => {
                format!("❌ رصيد المنشنات غير كافٍ (المتبقي: {remaining})")
            }
            Self::Unauthorized => "❌ يجب تسجيل الدخول أولاً".into(),
            Self::InvalidSignature => "❌ توقيع غير صالح".into(),
            Self::UpstreamFailure { .. } => "❌ تعذر الاتصال بديسكورد".into(),
            Self::InvalidConfig { .. }
            | Self::StorageError { .. }
            | Self::AuditError { .. }
            | Self::Io(_) => "❌ فشلت العملية".into(),
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ShopkeeperError>;
