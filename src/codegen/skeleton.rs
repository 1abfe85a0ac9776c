//! Fixed parts of the generated program: header, imports, bot construction,
//! shared helpers and the entry point.

use super::formatting::{PyWriter, escape_for_python, python_string};
use super::variables::{
    UserStore, generate_get_user_variable, generate_init_user_variables,
    generate_replace_variables_in_text,
};
use itertools::Itertools;

pub const DEFAULT_BOT_TOKEN: &str = "YOUR_BOT_TOKEN_HERE";

/// A command registered in the Telegram client menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuCommand {
    pub command: String,
    pub description: String,
}

pub fn emit_header(w: &mut PyWriter, project_name: &str) {
    w.line(0, "#!/usr/bin/env python3");
    w.line(0, "# -*- coding: utf-8 -*-");
    w.line(0, "\"\"\"");
    w.line(0, format!("{} - Telegram bot generated by tgflow", escape_for_python(project_name)));
    w.line(0, "\"\"\"");
    w.blank();
}

pub fn emit_imports(w: &mut PyWriter) {
    for line in [
        "import asyncio",
        "import logging",
        "import re",
        "from datetime import timedelta",
        "from typing import Optional",
        "",
        "from aiogram import Bot, Dispatcher, F, types",
        "from aiogram.enums import ParseMode",
        "from aiogram.exceptions import TelegramBadRequest, TelegramForbiddenError",
        "from aiogram.filters import Command, CommandStart",
        "from aiogram.types import (",
        "    BotCommand,",
        "    ChatPermissions,",
        "    InlineKeyboardButton,",
        "    InlineKeyboardMarkup,",
        "    KeyboardButton,",
        "    ReplyKeyboardMarkup,",
        "    ReplyKeyboardRemove,",
        ")",
        "from aiogram.utils.keyboard import InlineKeyboardBuilder, ReplyKeyboardBuilder",
    ] {
        if line.is_empty() {
            w.blank();
        } else {
            w.line(0, line);
        }
    }
    w.blank();
}

pub fn emit_bootstrap(w: &mut PyWriter, bot_token: &str, admin_ids: &[i64], store: &UserStore) {
    w.line(0, "logging.basicConfig(level=logging.INFO)");
    w.blank();
    w.line(0, format!("BOT_TOKEN = {}", python_string(bot_token)));
    w.blank();
    w.line(0, "# Telegram user ids allowed to open admin-only screens");
    w.line(0, format!("ADMIN_IDS = [{}]", admin_ids.iter().join(", ")));
    w.blank();
    w.line(0, "bot = Bot(token=BOT_TOKEN)");
    w.line(0, "dp = Dispatcher()");
    w.blank();
    w.raw(&store.declaration());
    w.blank();
    w.blank();
}

/// Variable helpers plus the access-check helpers used by node guards.
pub fn emit_helpers(w: &mut PyWriter, store: &UserStore) {
    let sections = [
        generate_init_user_variables(store),
        generate_replace_variables_in_text(),
        generate_get_user_variable(store),
        access_helpers(store),
    ];
    for section in sections {
        w.raw(&section);
        w.blank();
        w.blank();
    }
}

fn access_helpers(store: &UserStore) -> String {
    let mut w = PyWriter::new();
    w.line(0, "def is_admin(user_id):");
    w.line(1, "return user_id in ADMIN_IDS");
    w.blank();
    w.blank();
    w.line(0, "def is_private_chat(message):");
    w.line(1, "return message.chat.type == \"private\"");
    w.blank();
    w.blank();
    w.line(0, "async def check_auth(user_id):");
    w.line(1, "\"\"\"A user is authorized once the bot has seen them.\"\"\"");
    w.line(1, format!("return user_id in {}", store.name()));
    w.blank();
    w.blank();
    w.line(0, "async def is_chat_admin(chat_id, user_id):");
    w.line(1, "try:");
    w.line(2, "member = await bot.get_chat_member(chat_id, user_id)");
    w.line(2, "return member.status in (\"administrator\", \"creator\")");
    w.line(1, "except Exception as e:");
    w.line(2, "logging.warning(f\"Could not check admin status of {user_id} in {chat_id}: {e}\")");
    w.line(2, "return False");
    w.finish()
}

pub fn emit_main(w: &mut PyWriter, commands: &[MenuCommand]) {
    w.line(0, "async def main():");
    w.line(1, "\"\"\"Register the command menu and start polling.\"\"\"");
    if commands.is_empty() {
        w.line(1, "commands = []");
    } else {
        w.line(1, "commands = [");
        for command in commands {
            w.line(
                2,
                format!(
                    "BotCommand(command={}, description={}),",
                    python_string(&command.command),
                    python_string(&command.description)
                ),
            );
        }
        w.line(1, "]");
    }
    w.line(1, "await bot.set_my_commands(commands)");
    w.line(1, "await bot.delete_webhook(drop_pending_updates=True)");
    w.line(1, "await dp.start_polling(bot)");
    w.blank();
    w.blank();
    w.line(0, "if __name__ == \"__main__\":");
    w.line(1, "asyncio.run(main())");
}
