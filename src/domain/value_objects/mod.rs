//! Value Objects for the storefront

use std::fmt;
use uuid::Uuid;

/// Whose data a request may see and touch.
///
/// `Shared` is the unauthenticated mode where records carry no owner and
/// every caller sees the same cart, wishlist, addresses and orders.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OwnerScope {
    User(Uuid),
    Shared,
}

impl OwnerScope {
    /// Owner column value for records created in this scope.
    pub fn owner_id(&self) -> Option<Uuid> {
        match self {
            Self::User(id) => Some(*id),
            Self::Shared => None,
        }
    }

    pub fn owns(&self, owner: Option<Uuid>) -> bool { self.owner_id() == owner }
}

impl fmt::Display for OwnerScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User(id) => write!(f, "user:{}", id),
            Self::Shared => write!(f, "shared"),
        }
    }
}

/// Phone number value object: digits only, optional leading `+`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub fn parse(value: impl Into<String>) -> Result<Self, PhoneNumberError> {
        let raw: String = value.into().chars().filter(|c| !c.is_whitespace() && *c != '-').collect();
        if raw.is_empty() { return Err(PhoneNumberError::Empty); }
        let digits = raw.strip_prefix('+').unwrap_or(&raw);
        if !digits.chars().all(|c| c.is_ascii_digit()) { return Err(PhoneNumberError::NotNumeric); }
        if !(7..=15).contains(&digits.len()) { return Err(PhoneNumberError::BadLength); }
        Ok(Self(raw))
    }
    pub fn as_str(&self) -> &str { &self.0 }
    pub fn into_inner(self) -> String { self.0 }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

#[derive(Debug, Clone, PartialEq, Eq)] pub enum PhoneNumberError { Empty, NotNumeric, BadLength }
impl std::error::Error for PhoneNumberError {}
impl fmt::Display for PhoneNumberError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "phone number empty"),
            Self::NotNumeric => write!(f, "phone number must contain digits only"),
            Self::BadLength => write!(f, "phone number must have 7 to 15 digits"),
        }
    }
}

/// Quantity value object for cart lines. Between 1 and [`Quantity::MAX`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Quantity(u32);

impl Quantity {
    pub const ONE: Quantity = Quantity(1);
    pub const MAX: u32 = 1000;

    pub fn new(value: u32) -> Result<Self, QuantityError> {
        if value == 0 { return Err(QuantityError::Zero); }
        if value > Self::MAX { return Err(QuantityError::TooLarge); }
        Ok(Self(value))
    }
    pub fn value(&self) -> u32 { self.0 }
}

impl Default for Quantity { fn default() -> Self { Self::ONE } }

#[derive(Debug, Clone, PartialEq, Eq)] pub enum QuantityError { Zero, TooLarge }
impl std::error::Error for QuantityError {}
impl fmt::Display for QuantityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Zero => write!(f, "quantity must be at least 1"),
            Self::TooLarge => write!(f, "quantity cannot exceed {}", Quantity::MAX),
        }
    }
}
