use serde::Serialize;

/// Guild name used for badges of fresh visitors
pub const DEFAULT_GUILD_NAME: &str = "Novice Guild";
/// Rank used for badges of fresh visitors
pub const DEFAULT_RANK: &str = "Apprentice";

/// Highest level a decoded badge payload may carry. Anything above
/// this is rejected as malformed rather than clamped.
pub const MAX_LEVEL: u32 = 10_000;

/// A guild badge: the structured record a client carries in its token.
///
/// The admin flag is private on purpose. It is `false` for every badge
/// built through [`Badge::default`] or [`Badge::custom`], and there is
/// no `Deserialize` impl: the only way to rebuild a badge from bytes is
/// the crate-internal codec, reached through a verified token
/// (see [`crate::v1::token::IntegrityGuard::open_token`]).
///
/// # Example
/// ```
/// use guildforge::v1::badge::Badge;
///
/// let badge = Badge::custom("Iron Hammer".into(), "Journeyman".into(), 7);
/// assert_eq!(badge.message, "Member of Iron Hammer");
/// assert!(!badge.is_admin());
/// ```
#[derive(Serialize, Clone, PartialEq, Eq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    /// Guild the badge holder claims membership of
    pub guild_name: String,
    /// Rank within the guild
    pub rank: String,
    /// Guild level, `1..=MAX_LEVEL`
    pub level: u32,
    /// Display message shown on the realm page
    pub message: String,

    is_admin: bool,
}

impl Default for Badge {
    fn default() -> Self {
        Self {
            guild_name: DEFAULT_GUILD_NAME.into(),
            rank: DEFAULT_RANK.into(),
            level: 1,
            message: "Welcome to the forge!".into(),
            is_admin: false,
        }
    }
}

impl Badge {
    /// Build a badge from caller-supplied attributes. The admin flag is
    /// always `false` here: no creation path takes it from input.
    pub fn custom(guild_name: String, rank: String, level: u32) -> Self {
        Self {
            message: format!("Member of {guild_name}"),
            guild_name,
            rank,
            level,
            is_admin: false,
        }
    }

    /// Reassemble a badge from decoded wire fields, admin flag included.
    /// Only the codec calls this, and only on a payload whose integrity
    /// tag already verified.
    pub(crate) fn from_wire(
        guild_name: String,
        rank: String,
        level: u32,
        message: String,
        is_admin: bool,
    ) -> Self {
        Self {
            guild_name,
            rank,
            level,
            message,
            is_admin,
        }
    }

    /// Does this badge grant access to the master console?
    ///
    /// Only meaningful on badges recovered from a verified token; the
    /// construction paths above can never return `true`.
    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    /// Mark the badge as admin. Trusted-issue path for tests only;
    /// the server build never enables this feature.
    #[cfg(feature = "trusted-issue")]
    pub fn into_admin(mut self) -> Self {
        self.is_admin = true;
        self
    }
}
