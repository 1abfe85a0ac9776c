use super::{HandlerEmitter, Placement, emit_guards, emit_primary_signature, emit_text};
use crate::codegen::conditional::generate_conditional_logic;
use crate::codegen::formatting::{PyWriter, python_string, to_python_boolean};
use crate::codegen::graph::GraphContext;
use crate::codegen::keyboard::generate_keyboard;
use crate::codegen::variables::generate_universal_variable_replacement;
use crate::definition::{ModerationAction, Node, NodeData};

/// Group moderation commands: ban, unban, mute, unmute, kick, pin, unpin, delete.
///
/// The generated handler checks the caller is a chat administrator, resolves
/// its target from a replied-to message or a `text_mention` entity, performs
/// the privileged call and tells "the bot lacks rights" apart from other
/// failures.
pub struct ModerationEmitter {
    action: ModerationAction,
}

impl ModerationEmitter {
    pub fn new(action: ModerationAction) -> Self {
        Self { action }
    }
}

impl HandlerEmitter for ModerationEmitter {
    fn node_type(&self) -> &str {
        match self.action {
            ModerationAction::Ban => "ban_user",
            ModerationAction::Unban => "unban_user",
            ModerationAction::Mute => "mute_user",
            ModerationAction::Unmute => "unmute_user",
            ModerationAction::Kick => "kick_user",
            ModerationAction::Pin => "pin_message",
            ModerationAction::Unpin => "unpin_message",
            ModerationAction::Delete => "delete_message",
        }
    }

    fn placement(&self) -> Placement {
        Placement::Primary
    }

    fn emit(&self, node: &Node, ctx: &GraphContext<'_>) -> String {
        let data = &node.data;
        let verb = self.action.verb();
        let command = data.command_name().unwrap_or(verb);

        let mut w = PyWriter::new();
        emit_primary_signature(
            &mut w,
            &format!("@dp.message(Command({}))", python_string(command)),
            node,
            ctx,
        );
        emit_guards(&mut w, node, 1);
        emit_chat_scope(&mut w, data);
        w.line(1, "if not await is_chat_admin(chat_id, user_id):");
        w.line(2, "await message.answer(\"❌ Only chat administrators can use this command\")");
        w.line(2, "return");

        if self.action.targets_user() {
            emit_target_user(&mut w, verb);
        } else {
            emit_target_message(&mut w, self.action);
        }

        w.line(1, "try:");
        self.emit_api_call(&mut w, data);
        emit_text(&mut w, node, 2, self.action.default_success_text());
        if self.action.targets_user() {
            w.line(2, "text = text.replace(\"{target_name}\", target_name)");
        }
        if let Some(reason) = data.reason.as_deref().map(str::trim).filter(|r| !r.is_empty()) {
            w.line(2, format!("text += {}", python_string(&format!("\nReason: {}", reason))));
        }
        w.raw(&generate_universal_variable_replacement(ctx.store(), 2));
        // branches replace the success report; the action has already run
        w.raw(&generate_conditional_logic(node.data.active_conditional_messages(), 2, node, ctx));
        w.raw(&generate_keyboard(node, ctx, 2));

        w.line(1, "except TelegramBadRequest as e:");
        w.line(2, "error_text = str(e).lower()");
        w.line(2, "if \"not enough rights\" in error_text or \"administrator\" in error_text:");
        w.line(
            3,
            format!(
                "await message.answer(\"❌ The bot does not have enough admin rights to {} here\")",
                verb
            ),
        );
        w.line(2, "else:");
        w.line(3, format!("await message.answer(f\"❌ Failed to {}: {{e}}\")", verb));
        w.line(1, "except TelegramForbiddenError:");
        w.line(
            2,
            format!(
                "await message.answer(\"❌ The bot does not have enough admin rights to {} here\")",
                verb
            ),
        );
        w.line(1, "except Exception as e:");
        w.line(2, format!("logging.error(f\"Failed to {} in chat {{chat_id}}: {{e}}\")", verb));
        w.line(2, "await message.answer(\"❌ An unexpected error occurred, please try again later\")");
        w.finish()
    }
}

impl ModerationEmitter {
    fn emit_api_call(&self, w: &mut PyWriter, data: &NodeData) {
        let until = match data.duration.filter(|seconds| *seconds > 0) {
            Some(seconds) => format!(", until_date=timedelta(seconds={})", seconds),
            None => String::new(),
        };
        match self.action {
            ModerationAction::Ban => {
                w.line(
                    2,
                    format!(
                        "await bot.ban_chat_member(chat_id=chat_id, user_id=target_user.id{})",
                        until
                    ),
                );
            }
            ModerationAction::Unban => {
                w.line(
                    2,
                    "await bot.unban_chat_member(chat_id=chat_id, user_id=target_user.id, only_if_banned=True)",
                );
            }
            ModerationAction::Kick => {
                // a kick is a ban lifted straight away, so the user may rejoin
                w.line(2, "await bot.ban_chat_member(chat_id=chat_id, user_id=target_user.id)");
                w.line(2, "await bot.unban_chat_member(chat_id=chat_id, user_id=target_user.id)");
            }
            ModerationAction::Mute | ModerationAction::Unmute => {
                let default = self.action == ModerationAction::Unmute;
                emit_permissions(w, data, default);
                w.line(
                    2,
                    format!(
                        "await bot.restrict_chat_member(chat_id=chat_id, user_id=target_user.id, permissions=permissions{})",
                        if self.action == ModerationAction::Mute { until.as_str() } else { "" }
                    ),
                );
            }
            ModerationAction::Pin => {
                w.line(
                    2,
                    format!(
                        "await bot.pin_chat_message(chat_id=chat_id, message_id=target_message_id, disable_notification={})",
                        to_python_boolean(data.disable_notification)
                    ),
                );
            }
            ModerationAction::Unpin => {
                w.line(
                    2,
                    "await bot.unpin_chat_message(chat_id=chat_id, message_id=target_message_id)",
                );
            }
            ModerationAction::Delete => {
                w.line(2, "await bot.delete_message(chat_id=chat_id, message_id=target_message_id)");
            }
        }
    }
}

/// Binds `chat_id`: the configured group, or the current group chat.
fn emit_chat_scope(w: &mut PyWriter, data: &NodeData) {
    match data.target_group_id.as_deref().map(str::trim).filter(|id| !id.is_empty()) {
        Some(group) => {
            let literal = if group.parse::<i64>().is_ok() {
                group.to_string()
            } else {
                python_string(group)
            };
            w.line(1, format!("chat_id = {}", literal));
        }
        None => {
            w.line(1, "if message.chat.type not in (\"group\", \"supergroup\"):");
            w.line(2, "await message.answer(\"❌ This command only works in groups\")");
            w.line(2, "return");
            w.line(1, "chat_id = message.chat.id");
        }
    }
}

fn emit_target_user(w: &mut PyWriter, verb: &str) {
    w.line(1, "target_user = None");
    w.line(1, "if message.reply_to_message and message.reply_to_message.from_user:");
    w.line(2, "target_user = message.reply_to_message.from_user");
    w.line(1, "elif message.entities:");
    w.line(2, "for entity in message.entities:");
    w.line(3, "if entity.type == \"text_mention\" and entity.user:");
    w.line(4, "target_user = entity.user");
    w.line(4, "break");
    w.line(1, "if target_user is None:");
    w.line(
        2,
        format!(
            "await message.answer(\"❌ Reply to the user's message or mention them to {} them\")",
            verb
        ),
    );
    w.line(2, "return");
    w.line(
        1,
        "target_name = target_user.first_name or target_user.username or str(target_user.id)",
    );
}

fn emit_target_message(w: &mut PyWriter, action: ModerationAction) {
    if action == ModerationAction::Unpin {
        // without a reply the most recently pinned message is unpinned
        w.line(
            1,
            "target_message_id = message.reply_to_message.message_id if message.reply_to_message else None",
        );
        return;
    }
    w.line(1, "if not message.reply_to_message:");
    w.line(
        2,
        format!(
            "await message.answer(\"❌ Reply to the message you want to {}\")",
            action.verb()
        ),
    );
    w.line(2, "return");
    w.line(1, "target_message_id = message.reply_to_message.message_id");
}

/// Binds `permissions`. Unset flags take `default`: everything revoked for a
/// mute, everything restored for an unmute.
fn emit_permissions(w: &mut PyWriter, data: &NodeData, default: bool) {
    let flag = |value: Option<bool>| to_python_boolean(value.unwrap_or(default));
    let media = flag(data.can_send_media_messages);
    let fields = [
        ("can_send_messages", flag(data.can_send_messages)),
        ("can_send_audios", media),
        ("can_send_documents", media),
        ("can_send_photos", media),
        ("can_send_videos", media),
        ("can_send_video_notes", media),
        ("can_send_voice_notes", media),
        ("can_send_polls", flag(data.can_send_polls)),
        ("can_send_other_messages", flag(data.can_send_other_messages)),
        ("can_add_web_page_previews", flag(data.can_add_web_page_previews)),
        ("can_change_info", flag(data.can_change_info)),
        ("can_invite_users", flag(data.can_invite_users)),
        ("can_pin_messages", flag(data.can_pin_messages)),
    ];
    w.line(2, "permissions = ChatPermissions(");
    for (name, value) in fields {
        w.line(3, format!("{}={},", name, value));
    }
    w.line(2, ")");
}
