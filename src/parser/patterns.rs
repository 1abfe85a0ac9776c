//! Narrow, independent matchers over generated source. Each one recovers a
//! single field; a failed match leaves that field at its default.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    pub(super) static ref NODE_START: Regex =
        Regex::new(r"(?m)^[ \t]*# @@NODE_START:([A-Za-z0-9_@]+)@@[ \t]*\r?$")
            .expect("Node start pattern should be valid");
    pub(super) static ref NODE_END: Regex =
        Regex::new(r"(?m)^[ \t]*# @@NODE_END:([A-Za-z0-9_@]+)@@[ \t]*\r?$")
            .expect("Node end pattern should be valid");

    /// First `text = <literal>`: triple-quoted, then double, then single quoted.
    pub(super) static ref TEXT_ASSIGNMENT: Regex = Regex::new(
        r#"(?s)\btext = (?:"""((?:[^\\]|\\.)*?)"""|"((?:[^"\\\n]|\\.)*)"|'((?:[^'\\\n]|\\.)*)')"#
    )
    .expect("Text assignment pattern should be valid");

    /// Buttons of the node's own keyboard; conditional branches use `branch_builder`.
    pub(super) static ref INLINE_BUTTON: Regex = Regex::new(
        r#"\bbuilder\.add\(InlineKeyboardButton\(text="((?:[^"\\]|\\.)*)", (callback_data|url)="((?:[^"\\]|\\.)*)"\)\)"#
    )
    .expect("Inline button pattern should be valid");
    pub(super) static ref REPLY_BUTTON: Regex = Regex::new(
        r#"\bbuilder\.add\(KeyboardButton\(text="((?:[^"\\]|\\.)*)"(?:, (request_contact|request_location)=True)?\)\)"#
    )
    .expect("Reply button pattern should be valid");
    pub(super) static ref KEYBOARD_BUILDER: Regex =
        Regex::new(r"\bbuilder = (?:Inline|Reply)KeyboardBuilder\(\)").expect("Keyboard builder pattern should be valid");
    pub(super) static ref MULTI_SELECT_OPTION: Regex =
        Regex::new(r#"(?m)^[ \t]+"((?:[^"\\]|\\.)*)": "((?:[^"\\]|\\.)*)",$"#)
            .expect("Multi-select option pattern should be valid");
    pub(super) static ref MULTI_SELECT_OPTIONS: Regex =
        Regex::new(r"(?m)^MULTI_SELECT_OPTIONS_\w+ = \{")
            .expect("Multi-select options pattern should be valid");
    pub(super) static ref KEYBOARD_MARKUP: Regex =
        Regex::new(r"\bkeyboard = (InlineKeyboardMarkup|ReplyKeyboardMarkup)\(")
            .expect("Keyboard markup pattern should be valid");
    pub(super) static ref RESIZE_KEYBOARD: Regex =
        Regex::new(r"\bresize_keyboard=(True|False)").expect("Resize pattern should be valid");
    pub(super) static ref ONE_TIME_KEYBOARD: Regex =
        Regex::new(r"\bone_time_keyboard=(True|False)").expect("One-time pattern should be valid");

    pub(super) static ref COMMAND_START: Regex =
        Regex::new(r"\bCommandStart\(\)").expect("CommandStart pattern should be valid");
    pub(super) static ref COMMAND_FILTER: Regex = Regex::new(
        r#"\bCommand\("((?:[^"\\]|\\.)*)"\)|\bcommands\s*=\s*\[?\s*["']([^"']+)["']"#
    )
    .expect("Command filter pattern should be valid");
    pub(super) static ref MEDIA_FILTER: Regex =
        Regex::new(r"\bF\.(photo|video|audio|voice|document|sticker|animation)\b")
            .expect("Media filter pattern should be valid");
    pub(super) static ref PARSE_MODE: Regex =
        Regex::new(r"\bParseMode\.(HTML|MARKDOWN)\b").expect("Parse mode pattern should be valid");
    pub(super) static ref MODERATION_VERB: Regex =
        Regex::new(r"Failed to (ban|unban|mute|unmute|kick|pin|unpin|delete)\b")
            .expect("Moderation verb pattern should be valid");
    pub(super) static ref DURATION: Regex =
        Regex::new(r"until_date=timedelta\(seconds=(\d+)\)").expect("Duration pattern should be valid");
    pub(super) static ref REASON: Regex =
        Regex::new(r#"\btext \+= "\\nReason: ((?:[^"\\]|\\.)*)""#).expect("Reason pattern should be valid");

    pub(super) static ref TARGET_GROUP: Regex =
        Regex::new(r#"(?m)^[ \t]+chat_id = (-?\d+|"((?:[^"\\]|\\.)*)")\r?$"#)
            .expect("Target group pattern should be valid");
    pub(super) static ref PERMISSION_FLAG: Regex =
        Regex::new(r"(?m)^[ \t]+(can_\w+)=(True|False),\r?$").expect("Permission pattern should be valid");
    pub(super) static ref SELECTION_VARIABLE: Regex =
        Regex::new(r#"\bselected = \w+\.get\(user_id, \{\}\)\.get\("((?:[^"\\]|\\.)*)", \[\]\)"#)
            .expect("Selection variable pattern should be valid");
    pub(super) static ref MEDIA_VARIABLE: Regex =
        Regex::new(r#"\["((?:[^"\\]|\\.)*)"\] = message\.\w+(?:\[-1\])?\.file_id"#)
            .expect("Media variable pattern should be valid");
    /// Control handed to another node with the current `message` and `user`.
    pub(super) static ref TRANSITION: Regex =
        Regex::new(r"\bawait (\w+)\(message, (?:user=)?user\)").expect("Transition pattern should be valid");

    /// The function a block defines first: its primary handler or `show_` coroutine.
    pub(super) static ref FUNCTION_DEF: Regex =
        Regex::new(r"(?m)^async def (\w+)\(message: types\.Message, user")
            .expect("Function pattern should be valid");
    pub(super) static ref REPLY_TEXT_HANDLER: Regex = Regex::new(
        r#"@dp\.message\(F\.text == "((?:[^"\\]|\\.)*)"\)\r?\nasync def \w+\(message: types\.Message\):\r?\n[ \t]+await (\w+)\("#
    )
    .expect("Reply handler pattern should be valid");
    pub(super) static ref SYNONYM_HANDLER: Regex = Regex::new(
        r#"message\.text\.lower\(\) == "((?:[^"\\]|\\.)*)"\)\r?\nasync def \w+_synonym_\d+_handler\(message: types\.Message\):\r?\n[ \t]+await (\w+)\(message\)"#
    )
    .expect("Synonym handler pattern should be valid");
    pub(super) static ref INPUT_BRANCH: Regex = Regex::new(
        r#"waiting_for == "((?:[^"\\]|\\.)*)":\r?\n[ \t]+\w+\.setdefault\(user_id, \{\}\)\["((?:[^"\\]|\\.)*)"\] = message\.text(?:\r?\n[ \t]+await (\w+)\(message, )?"#
    )
    .expect("Input branch pattern should be valid");
    /// A callback handler that answers and hands over to a node's function.
    /// Group 2 is set for `cmd_` command delegates.
    pub(super) static ref CALLBACK_ROUTE: Regex = Regex::new(
        r#"@dp\.callback_query\(F\.data == "((?:[^"\\]|\\.)*)"\)\r?\nasync def handle_(command_)?callback_\w+\(callback_query: types\.CallbackQuery\):\r?\n[ \t]+await callback_query\.answer\(\)\r?\n[ \t]+await (\w+)\(callback_query\.message"#
    )
    .expect("Callback route pattern should be valid");
    pub(super) static ref DONE_HANDLER: Regex = Regex::new(
        r#"@dp\.callback_query\(F\.data == "((?:[^"\\]|\\.)*)"\)\r?\nasync def handle_multi_select_done_"#
    )
    .expect("Completion handler pattern should be valid");
    pub(super) static ref MENU_COMMAND: Regex = Regex::new(
        r#"BotCommand\(command="((?:[^"\\]|\\.)*)", description="((?:[^"\\]|\\.)*)"\)"#
    )
    .expect("Menu command pattern should be valid");
}
