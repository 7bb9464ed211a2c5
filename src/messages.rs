//! User-facing strings.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Language used for rendered pages and error notices.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Locale {
    #[default]
    En,
    Ru,
}

impl Locale {
    pub fn install_button_title(self) -> &'static str {
        match self {
            Self::En => "Install integration",
            Self::Ru => "Установить интеграцию",
        }
    }

    pub fn no_products(self) -> &'static str {
        match self {
            Self::En => "there are no products in the deal",
            Self::Ru => "в сделке нет продуктов",
        }
    }

    pub fn token_error(self) -> &'static str {
        match self {
            Self::En => "token error, follow the link to renew the token",
            Self::Ru => "ошибка токена перейдите по ссылке чтобы обновить токен",
        }
    }

    pub fn renew_token_link(self) -> &'static str {
        match self {
            Self::En => "Recreate token",
            Self::Ru => "Пересоздать токен",
        }
    }

    pub fn contact_developer(self) -> &'static str {
        match self {
            Self::En => "an error occurred, contact the widget developer",
            Self::Ru => "произошла ошибка обратитесь к разработчику виджета",
        }
    }

    /// Column headers of the products table: name, SKU, price, quantity.
    pub fn table_headers(self) -> [&'static str; 4] {
        match self {
            Self::En => ["Name", "SKU", "Price in $", "Qty"],
            Self::Ru => ["наименование", "SKU", "Цена в $", "Кол-во"],
        }
    }
}
