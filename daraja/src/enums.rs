//! Enumerated wire values accepted by the Daraja gateway.
//!
//! Each enumeration is a closed vocabulary: a symbolic name bound to the
//! exact string or integer literal the gateway expects, transmitted
//! verbatim. Operations accept either the symbol or the raw wire value;
//! the `*Value` resolver newtypes perform that union once, at the
//! payload-build boundary, instead of scattering type checks through the
//! services.

use std::fmt::{self, Display, Formatter};

use serde::Serialize;

/// Transaction types for STK push and C2B simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionType {
    /// `CustomerBuyGoodsOnline`: till payment.
    CustomerBuyGoodsOnline,
    /// `CustomerPayBillOnline`: paybill payment with an account reference.
    CustomerPayBillOnline,
}

impl TransactionType {
    /// Returns the wire string transmitted to the gateway.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CustomerBuyGoodsOnline => "CustomerBuyGoodsOnline",
            Self::CustomerPayBillOnline => "CustomerPayBillOnline",
        }
    }
}

/// Command identifiers for B2C, reversal and query operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandId {
    /// `BusinessPayment`
    BusinessPayment,
    /// `SalaryPayment`
    SalaryPayment,
    /// `PromotionPayment`
    PromotionPayment,
    /// `AccountBalance`
    AccountBalance,
    /// `TransactionStatusQuery`
    TransactionStatusQuery,
    /// `TransactionReversal`
    TransactionReversal,
}

impl CommandId {
    /// Returns the wire string transmitted to the gateway.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::BusinessPayment => "BusinessPayment",
            Self::SalaryPayment => "SalaryPayment",
            Self::PromotionPayment => "PromotionPayment",
            Self::AccountBalance => "AccountBalance",
            Self::TransactionStatusQuery => "TransactionStatusQuery",
            Self::TransactionReversal => "TransactionReversal",
        }
    }
}

/// C2B URL-registration response types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseType {
    /// `Completed`: complete the transaction if the validation URL is
    /// unreachable.
    Completed,
    /// `Canceled`: cancel it instead.
    Canceled,
}

impl ResponseType {
    /// Returns the wire string transmitted to the gateway.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "Completed",
            Self::Canceled => "Canceled",
        }
    }
}

/// Organization identifier types for balance, status and reversal calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentifierType {
    /// MSISDN (subscriber phone number) = `1`
    Msisdn = 1,
    /// Till number = `2`
    TillNumber = 2,
    /// Organization short code = `4`
    OrganizationShortCode = 4,
}

impl IdentifierType {
    /// Returns the wire integer transmitted to the gateway.
    #[must_use]
    pub const fn code(self) -> u64 {
        self as u64
    }
}

/// QR transaction codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrxCode {
    /// `BG`: buy goods.
    Bg,
    /// `PB`: paybill.
    Pb,
    /// `SB`: send to business.
    Sb,
    /// `SM`: send money.
    Sm,
    /// `WA`: withdraw at agent.
    Wa,
}

impl TrxCode {
    /// Returns the wire string transmitted to the gateway.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Bg => "BG",
            Self::Pb => "PB",
            Self::Sb => "SB",
            Self::Sm => "SM",
            Self::Wa => "WA",
        }
    }
}

macro_rules! display_as_str {
    ($($name:ident),+ $(,)?) => {$(
        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    )+};
}

display_as_str!(TransactionType, CommandId, ResponseType, TrxCode);

macro_rules! string_wire_value {
    ($(#[$meta:meta])* $name:ident from $symbol:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Returns the resolved wire string.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<$symbol> for $name {
            fn from(symbol: $symbol) -> Self {
                Self(symbol.as_str().to_owned())
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                Self(raw.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                Self(raw)
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_wire_value! {
    /// A resolved `TransactionType` wire value: either a [`TransactionType`]
    /// symbol or a raw string passed through verbatim.
    TransactionTypeValue from TransactionType
}

string_wire_value! {
    /// A resolved `CommandID` wire value: either a [`CommandId`] symbol or
    /// a raw string passed through verbatim.
    CommandValue from CommandId
}

string_wire_value! {
    /// A resolved `ResponseType` wire value: either a [`ResponseType`]
    /// symbol or a raw string passed through verbatim.
    ResponseTypeValue from ResponseType
}

string_wire_value! {
    /// A resolved `TrxCode` wire value: either a [`TrxCode`] symbol or a
    /// raw string passed through verbatim.
    TrxCodeValue from TrxCode
}

/// A resolved `IdentifierType` wire value.
///
/// The gateway documents identifier types as integers but tolerates
/// string forms; raw inputs of either kind are transmitted verbatim,
/// which is why this wraps a JSON scalar rather than forcing a numeric
/// conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct IdentifierTypeValue(serde_json::Value);

impl IdentifierTypeValue {
    /// Returns the resolved wire scalar.
    #[must_use]
    pub const fn as_value(&self) -> &serde_json::Value {
        &self.0
    }
}

impl From<IdentifierType> for IdentifierTypeValue {
    fn from(symbol: IdentifierType) -> Self {
        Self(symbol.code().into())
    }
}

impl From<u64> for IdentifierTypeValue {
    fn from(raw: u64) -> Self {
        Self(raw.into())
    }
}

impl From<&str> for IdentifierTypeValue {
    fn from(raw: &str) -> Self {
        Self(raw.into())
    }
}

impl From<String> for IdentifierTypeValue {
    fn from(raw: String) -> Self {
        Self(raw.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_and_raw_value_resolve_identically() {
        assert_eq!(
            CommandValue::from(CommandId::BusinessPayment),
            CommandValue::from("BusinessPayment"),
        );
        assert_eq!(
            TransactionTypeValue::from(TransactionType::CustomerPayBillOnline),
            TransactionTypeValue::from("CustomerPayBillOnline"),
        );
        assert_eq!(
            ResponseTypeValue::from(ResponseType::Completed),
            ResponseTypeValue::from("Completed"),
        );
        assert_eq!(TrxCodeValue::from(TrxCode::Bg), TrxCodeValue::from("BG"));
        assert_eq!(
            IdentifierTypeValue::from(IdentifierType::TillNumber),
            IdentifierTypeValue::from(2u64),
        );
    }

    #[test]
    fn identifier_codes_match_the_gateway_table() {
        assert_eq!(IdentifierType::Msisdn.code(), 1);
        assert_eq!(IdentifierType::TillNumber.code(), 2);
        assert_eq!(IdentifierType::OrganizationShortCode.code(), 4);
    }

    #[test]
    fn wire_values_serialize_transparently() {
        let command = CommandValue::from(CommandId::TransactionReversal);
        assert_eq!(
            serde_json::to_string(&command).unwrap(),
            "\"TransactionReversal\""
        );
        let id = IdentifierTypeValue::from(IdentifierType::Msisdn);
        assert_eq!(serde_json::to_string(&id).unwrap(), "1");
    }
}
