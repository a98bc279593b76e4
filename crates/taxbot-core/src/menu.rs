use crate::messaging::types::{InlineButton, InlineKeyboard};

/// The three control-panel menu entries.
///
/// The wire values double as callback data, so they must stay stable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuAction {
    AddTaxChannel,
    RemoveTaxChannel,
    ShowTaxChannels,
}

impl MenuAction {
    pub const ALL: [MenuAction; 3] = [
        Self::AddTaxChannel,
        Self::RemoveTaxChannel,
        Self::ShowTaxChannels,
    ];

    pub fn value(self) -> &'static str {
        match self {
            Self::AddTaxChannel => "addTaxChannel",
            Self::RemoveTaxChannel => "removeTaxChannel",
            Self::ShowTaxChannels => "showTaxChannels",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::AddTaxChannel => "Add tax channel",
            Self::RemoveTaxChannel => "Remove tax channel",
            Self::ShowTaxChannels => "Show tax channels",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.value() == value)
    }
}

/// Keyboard for the admin control panel, one action per row.
pub fn panel_keyboard() -> InlineKeyboard {
    InlineKeyboard::new(
        MenuAction::ALL
            .into_iter()
            .map(|a| InlineButton {
                label: a.label().to_string(),
                callback_data: a.value().to_string(),
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_round_trip_through_parse() {
        for action in MenuAction::ALL {
            assert_eq!(MenuAction::parse(action.value()), Some(action));
        }
    }

    #[test]
    fn unknown_values_do_not_parse() {
        assert_eq!(MenuAction::parse(""), None);
        assert_eq!(MenuAction::parse("dropTables"), None);
        assert_eq!(MenuAction::parse("AddTaxChannel"), None); // case-sensitive
    }

    #[test]
    fn panel_has_one_button_per_action() {
        let kb = panel_keyboard();
        assert_eq!(kb.buttons.len(), 3);
        assert_eq!(kb.buttons[0].callback_data, "addTaxChannel");
        assert_eq!(kb.buttons[1].callback_data, "removeTaxChannel");
        assert_eq!(kb.buttons[2].callback_data, "showTaxChannels");
    }
}
