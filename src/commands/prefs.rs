//! Language and theme commands.

use crate::args::{LanguageArgs, ThemeArgs};
use crate::commands::Out;
use crate::prefs::{self, Language, Theme};
use crate::{Config, Result};

/// Shows the current language, or switches to the one given in `args`.
pub async fn language(config: Config, args: LanguageArgs) -> Result<Out<Language>> {
    let store = config.store().await?;
    match args.language() {
        Some(language) => {
            prefs::set_language(&store, language).await?;
            Ok(Out::new(format!("Language set to {language}"), language))
        }
        None => {
            let language = prefs::language(&store).await;
            Ok(Out::new(format!("Language: {language}"), language))
        }
    }
}

/// Shows the current theme, or switches to the one given in `args`.
pub async fn theme(config: Config, args: ThemeArgs) -> Result<Out<Theme>> {
    let store = config.store().await?;
    match args.theme() {
        Some(theme) => {
            prefs::set_theme(&store, theme).await?;
            Ok(Out::new(format!("Theme set to {theme}"), theme))
        }
        None => {
            let theme = prefs::theme(&store).await;
            Ok(Out::new(format!("Theme: {theme}"), theme))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_language() {
        let env = TestEnv::new().await;
        let out = language(env.config(), LanguageArgs::new(None)).await.unwrap();
        assert_eq!(out.message(), "Language: en");

        let out = language(env.config(), LanguageArgs::new(Some(Language::Vi)))
            .await
            .unwrap();
        assert_eq!(out.message(), "Language set to vi");

        let out = language(env.config(), LanguageArgs::new(None)).await.unwrap();
        assert_eq!(out.structure(), Some(&Language::Vi));
    }

    #[tokio::test]
    async fn test_theme() {
        let env = TestEnv::new().await;
        let out = theme(env.config(), ThemeArgs::new(None)).await.unwrap();
        assert_eq!(out.message(), "Theme: light");

        theme(env.config(), ThemeArgs::new(Some(Theme::Dark)))
            .await
            .unwrap();
        let out = theme(env.config(), ThemeArgs::new(None)).await.unwrap();
        assert_eq!(out.message(), "Theme: dark");
    }
}
