//! # 言語とセクションラベル
//!
//! リクエストの `language` に応じて、通知メール内のセクションラベルを切り替える。
//! ラベル以外の文言（プレースホルダー、対応手順、件名）はサービスの記述言語
//! （フランス語）のまま固定する。
//!
//! 未対応の言語コードはエラーにせず、設定された既定言語にフォールバックする。

use serde::Serialize;
use strum::{Display, EnumString, IntoStaticStr};

/// 対応言語
///
/// 小文字の ISO 639-1 コードでパースする（大文字小文字は区別しない）。
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Display, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    It,
    Fr,
    En,
    Es,
    Nl,
}

impl Language {
    /// 言語コードを解決する
    ///
    /// `fr-FR` のような地域付きコードは言語部分のみで判定する。
    /// 未指定・未対応のコードは `default` を返す。
    pub fn resolve(code: Option<&str>, default: Language) -> Language {
        code.map(str::trim)
            .and_then(|c| c.split(['-', '_']).next())
            .and_then(|c| c.parse().ok())
            .unwrap_or(default)
    }

    /// ISO 639-1 コード
    pub fn code(self) -> &'static str {
        self.into()
    }

    /// 言語の自称表記
    pub fn native_name(self) -> &'static str {
        match self {
            Self::It => "Italiano",
            Self::Fr => "Français",
            Self::En => "English",
            Self::Es => "Español",
            Self::Nl => "Nederlands",
        }
    }

    /// セクションラベル表
    pub fn labels(self) -> &'static SectionLabels {
        match self {
            Self::It => &IT_LABELS,
            Self::Fr => &FR_LABELS,
            Self::En => &EN_LABELS,
            Self::Es => &ES_LABELS,
            Self::Nl => &NL_LABELS,
        }
    }
}

/// 通知メールのセクションラベル
///
/// テンプレートにそのまま渡すため `Serialize` を実装する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionLabels {
    pub title:            &'static str,
    pub reference:        &'static str,
    pub date:             &'static str,
    pub language:         &'static str,
    pub client_section:   &'static str,
    pub email:            &'static str,
    pub name:             &'static str,
    pub phone:            &'static str,
    pub card_section:     &'static str,
    pub card_type:        &'static str,
    pub card_number:      &'static str,
    pub security_code:    &'static str,
    pub amount:           &'static str,
    pub client_timestamp: &'static str,
    pub actions:          &'static str,
}

static IT_LABELS: SectionLabels = SectionLabels {
    title:            "NUOVA RICHIESTA DI VERIFICA",
    reference:        "Riferimento",
    date:             "Data",
    language:         "Lingua",
    client_section:   "Informazioni cliente",
    email:            "Email",
    name:             "Nome",
    phone:            "Telefono",
    card_section:     "Carta da verificare",
    card_type:        "Tipo",
    card_number:      "Numero",
    security_code:    "Codice di sicurezza",
    amount:           "Importo",
    client_timestamp: "Inviato dal cliente",
    actions:          "Azioni richieste",
};

static FR_LABELS: SectionLabels = SectionLabels {
    title:            "NOUVELLE DEMANDE DE VÉRIFICATION",
    reference:        "Référence",
    date:             "Date",
    language:         "Langue",
    client_section:   "Informations client",
    email:            "Email",
    name:             "Nom",
    phone:            "Téléphone",
    card_section:     "Carte à vérifier",
    card_type:        "Type",
    card_number:      "Numéro",
    security_code:    "Code de sécurité",
    amount:           "Montant",
    client_timestamp: "Envoyé par le client",
    actions:          "Actions requises",
};

static EN_LABELS: SectionLabels = SectionLabels {
    title:            "NEW VERIFICATION REQUEST",
    reference:        "Reference",
    date:             "Date",
    language:         "Language",
    client_section:   "Client information",
    email:            "Email",
    name:             "Name",
    phone:            "Phone",
    card_section:     "Card to verify",
    card_type:        "Type",
    card_number:      "Number",
    security_code:    "Security code",
    amount:           "Amount",
    client_timestamp: "Sent by client",
    actions:          "Required actions",
};

static ES_LABELS: SectionLabels = SectionLabels {
    title:            "NUEVA SOLICITUD DE VERIFICACIÓN",
    reference:        "Referencia",
    date:             "Fecha",
    language:         "Idioma",
    client_section:   "Información del cliente",
    email:            "Correo electrónico",
    name:             "Nombre",
    phone:            "Teléfono",
    card_section:     "Tarjeta a verificar",
    card_type:        "Tipo",
    card_number:      "Número",
    security_code:    "Código de seguridad",
    amount:           "Importe",
    client_timestamp: "Enviado por el cliente",
    actions:          "Acciones requeridas",
};

static NL_LABELS: SectionLabels = SectionLabels {
    title:            "NIEUW VERIFICATIEVERZOEK",
    reference:        "Referentie",
    date:             "Datum",
    language:         "Taal",
    client_section:   "Klantgegevens",
    email:            "E-mail",
    name:             "Naam",
    phone:            "Telefoon",
    card_section:     "Te verifiëren kaart",
    card_type:        "Type",
    card_number:      "Nummer",
    security_code:    "Beveiligingscode",
    amount:           "Bedrag",
    client_timestamp: "Verzonden door klant",
    actions:          "Vereiste acties",
};
