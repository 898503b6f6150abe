use {
    crate::U256,
    serde::{
        Deserializer,
        Serializer,
        de::{self, Visitor},
    },
    serde_with::{DeserializeAs, SerializeAs},
    std::fmt,
};

/// Serialize [`U256`] as a decimal string and deserialize [`U256`] from a
/// decimal string, a `0x` prefixed hex string or a JSON/TOML integer. Chain
/// nodes are not consistent in how they encode balances so all of them are
/// accepted.
pub struct HexOrDecimalU256;

impl<'de> DeserializeAs<'de, U256> for HexOrDecimalU256 {
    fn deserialize_as<D>(deserializer: D) -> Result<U256, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct U256Visitor;

        impl Visitor<'_> for U256Visitor {
            type Value = U256;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                write!(
                    formatter,
                    "a u256 encoded either as 0x hex prefixed or decimal encoded string"
                )
            }

            fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                match s.trim().strip_prefix("0x") {
                    Some(hex) => U256::from_str_radix(hex, 16).map_err(|err| {
                        E::custom(format!("failed to decode {s:?} as hex u256: {err}"))
                    }),
                    None => U256::from_str_radix(s, 10).map_err(|err| {
                        E::custom(format!("failed to decode {s:?} as decimal u256: {err}"))
                    }),
                }
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(U256::from(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                u64::try_from(value)
                    .map(U256::from)
                    .map_err(|_| E::custom(format!("negative value {value} for u256")))
            }
        }

        deserializer.deserialize_any(U256Visitor)
    }
}

impl SerializeAs<U256> for HexOrDecimalU256 {
    fn serialize_as<S>(source: &U256, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&source.to_string())
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        serde::{Deserialize, Serialize},
        serde_with::serde_as,
    };

    #[serde_as]
    #[derive(Debug, Deserialize, Serialize, PartialEq)]
    struct Balance(#[serde_as(as = "HexOrDecimalU256")] U256);

    #[test]
    fn test_deserialization_from_json() {
        let result: Balance = serde_json::from_str(r#""0x10""#).expect("Valid U256");
        assert_eq!(result, Balance(U256::from(16_u64)));

        let result: Balance = serde_json::from_str(r#""10""#).expect("Valid U256");
        assert_eq!(result, Balance(U256::from(10_u64)));

        let result: Balance = serde_json::from_str("10").expect("Valid U256");
        assert_eq!(result, Balance(U256::from(10_u64)));

        assert!(serde_json::from_str::<Balance>(r#""10e""#).is_err());
        assert!(serde_json::from_str::<Balance>(r#""0xx1""#).is_err());
        assert!(serde_json::from_str::<Balance>("-1").is_err());
    }

    #[test]
    fn test_serialization() {
        let serialized =
            serde_json::to_string(&Balance(U256::from(10_u64))).expect("Failed to serialize");
        assert_eq!(serialized, "\"10\"");
    }
}
