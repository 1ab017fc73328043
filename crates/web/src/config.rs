use anyhow::{Context, Result};
use scoring::{CompetitorCode, DuelRoster};

/// Teammate pairings of the 2025 grid, used when `DUEL_ROSTER` is unset.
pub const DEFAULT_DUEL_ROSTER: &str = "MER:ANT/RUS,REB:VER/TSU,FER:LEC/HAM,MCL:NOR/PIA,ALP:GAS/DOO,\
                                       KIK:HUL/BOR,RBS:LAW/HAD,HAS:OCO/BEA,WIL:SAI/ALB,ASM:ALO/STR";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub api_keys: String,
    pub season_lock: bool,
    pub registration_lock: bool,
    pub duel_roster: DuelRoster,
    pub standings_exclude: Vec<CompetitorCode>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let roster = std::env::var("DUEL_ROSTER").unwrap_or_else(|_| DEFAULT_DUEL_ROSTER.to_string());

        Ok(Self {
            host: std::env::var("HOST").context("Cannot load HOST env variable")?,
            port: std::env::var("PORT")
                .context("PORT must be a number")?
                .parse()?,
            database_url: std::env::var("DATABASE_URL")
                .context("Cannot load DATABASE_URL env variable")?,
            api_keys: std::env::var("API_KEYS").unwrap_or_default(),
            season_lock: parse_flag(&std::env::var("SEASON_LOCK").unwrap_or_default()),
            registration_lock: parse_flag(&std::env::var("REGISTRATION_LOCK").unwrap_or_default()),
            duel_roster: roster.parse().context("DUEL_ROSTER must look like TEAM:A/B,TEAM:A/B")?,
            standings_exclude: parse_codes(&std::env::var("STANDINGS_EXCLUDE").unwrap_or_default()),
        })
    }
}

/// `1`, `true`, `yes` and `on` (any case) enable a flag; anything else leaves
/// it off.
pub fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

pub fn parse_codes(value: &str) -> Vec<CompetitorCode> {
    value.split(',').filter_map(CompetitorCode::parse).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("true"));
        assert!(parse_flag(" ON "));
        assert!(parse_flag("1"));
        assert!(!parse_flag(""));
        assert!(!parse_flag("0"));
        assert!(!parse_flag("locked"));
    }

    #[test]
    fn test_parse_codes() {
        assert_eq!(
            parse_codes("col, doo,,"),
            vec![CompetitorCode::new("COL"), CompetitorCode::new("DOO")]
        );
        assert!(parse_codes("").is_empty());
    }

    #[test]
    fn test_default_roster() {
        let roster: DuelRoster = DEFAULT_DUEL_ROSTER.parse().unwrap();
        assert_eq!(roster.len(), 10);
    }
}
