use super::TextPack;

pub static PERSIAN_TEXTS: TextPack = TextPack {
    welcome: "سلام {name}! این دستیار گیلد است. با دکمه‌های زیر درخواست عضویت بدهید، وضعیت درخواست را ببینید یا زبان را عوض کنید.",
    welcome_admin_hint: "\nشما ادمین هستید: دکمه پنل مدیریت در دسترس است.",
    btn_apply: "درخواست عضویت در گیلد",
    btn_status: "وضعیت درخواست",
    btn_withdraw: "انصراف از درخواست",
    btn_language: "زبان",
    btn_admin_panel: "پنل مدیریت",

    apply_already_member: "شما ادمین گیلد هستید و نیازی به درخواست ندارید.",
    apply_duplicate: "شما یک درخواست در حال بررسی دارید. می‌توانید وضعیت آن را ببینید یا انصراف دهید.",
    flow_started: "بیایید فرم درخواست را با هم پر کنیم. هر زمان خواستید /cancel را بفرستید.",
    flow_no_questions: "در حال حاضر پرسشی برای فرم درخواست تنظیم نشده است. لطفا بعدا دوباره تلاش کنید.",
    flow_choice_hint: "لطفا یکی از این گزینه‌ها را بفرستید: {options}",
    flow_invalid_choice: "این جزو گزینه‌ها نیست. لطفا یکی از این گزینه‌ها را بفرستید: {options}",
    flow_empty_answer: "لطفا یک پاسخ غیرخالی بفرستید.",
    flow_rate_limited: "پاسخ‌ها را خیلی سریع می‌فرستید. لطفا کمی صبر کنید و دوباره تلاش کنید.",
    flow_summary_header: "خلاصه پاسخ‌های شما:",
    flow_submitted: "درخواست شما ثبت شد. ادمین‌ها به زودی آن را بررسی می‌کنند.",
    flow_submit_failed: "هنگام ذخیره درخواست مشکلی پیش آمد. لطفا دوباره از دکمه درخواست شروع کنید.",
    cancel_done: "لغو شد. چیزی از مرحله نیمه‌کاره ذخیره نشد.",
    cancel_nothing: "چیزی برای لغو وجود نداشت.",

    status_none: "درخواستی از شما ثبت نشده است.",
    status_pending: "درخواست شما در انتظار بررسی است.",
    status_approved: "درخواست شما تایید شد. به گیلد خوش آمدید!",
    status_denied: "درخواست شما رد شد.",
    status_withdrawn: "شما از درخواست خود انصراف دادید.",
    status_note_suffix: "\nیادداشت بررسی‌کننده: {note}",
    withdraw_done: "درخواست شما پس گرفته شد.",
    withdraw_none: "درخواست در حال بررسی ندارید که پس بگیرید.",

    language_menu_title: "زبان خود را انتخاب کنید:",
    language_set: "زبان روی {language} تنظیم شد.",
    language_closed: "منوی زبان بسته شد.",
    btn_language_close: "بستن",

    admin_only: "این عملیات فقط برای ادمین‌های گیلد است.",
    owner_only: "این عملیات فقط برای مالک ربات است.",

    admin_panel_title: "پنل مدیریت. یک بخش را انتخاب کنید:",
    btn_admin_view_applications: "درخواست‌های در انتظار",
    btn_admin_view_members: "اعضای تایید شده",
    btn_admin_manage_admins: "مدیریت ادمین‌ها",
    btn_admin_manage_questions: "مدیریت پرسش‌ها",
    btn_back: "بازگشت",
    pending_empty: "درخواست در انتظاری وجود ندارد.",
    pending_header: "درخواست‌های در انتظار:",
    members_empty: "هنوز عضو تایید شده‌ای وجود ندارد.",
    members_header: "اعضای تایید شده:",
    manage_admins_title: "مدیریت ادمین‌ها:",
    btn_admin_add: "ارتقا",
    btn_admin_remove: "عزل",
    btn_admin_list: "فهرست ادمین‌ها",
    admin_add_prompt: "شناسه عددی کاربر مورد نظر برای ارتقا را بفرستید.",
    admin_remove_prompt: "شناسه عددی کاربر مورد نظر برای عزل را بفرستید.",
    admin_added: "کاربر {user_id} اکنون ادمین است.",
    admin_add_duplicate: "کاربر {user_id} از قبل ادمین است.",
    admin_removed: "کاربر {user_id} دیگر ادمین نیست.",
    admin_remove_missing: "کاربر {user_id} ادمین نیست.",
    admin_invalid_id: "این یک شناسه عددی معتبر نیست. دوباره تلاش کنید یا /cancel بفرستید.",
    admins_header: "ادمین‌های فعلی:",
    admins_empty: "هنوز ادمینی ثبت نشده است.",

    review_forward_header: "درخواست جدید از {name}:",
    review_note_prompt: "یادداشتی برای {name} بفرستید، یا برای پایان بدون یادداشت «{keyword}» را بفرستید.",
    review_not_found: "این درخواست قبلا رسیدگی شده است.",
    review_done_admin: "انجام شد. به {name} اطلاع داده شد.",
    review_skipped: "برای بررسی‌کننده دیگری باقی ماند.",
    review_approved_applicant: "خبر خوب! درخواست عضویت شما در گیلد تایید شد.",
    review_denied_applicant: "درخواست عضویت شما در گیلد رد شد.",
    review_note_line: "\nیادداشت بررسی‌کنندگان: {note}",
    btn_review_approve: "تایید",
    btn_review_deny: "رد",
    btn_review_skip: "رد کردن نوبت",

    questions_menu_title: "پرسش‌های فرم درخواست ({count}). یکی را ویرایش یا حذف کنید، یا از ابزارهای زیر استفاده کنید:",
    btn_question_add: "افزودن پرسش",
    btn_question_import: "درون‌ریزی فرم",
    btn_question_export: "برون‌بری فرم",
    btn_question_reset: "بازنشانی به پیش‌فرض",
    question_row_edit: "ویرایش: {title}",
    question_row_delete: "حذف: {title}",
    question_add_prompt: "پرسش جدید را به صورت JSON بفرستید، برای نمونه:\n{\"question_id\": \"clan_tag\", \"prompt\": \"تگ کلن شما چیست؟\", \"order\": 9}\nبرای توقف /cancel بفرستید.",
    question_edit_prompt: "تعریف جایگزین «{question}» را به صورت JSON بفرستید. برای توقف /cancel بفرستید.",
    question_import_prompt: "کل فرم را به صورت آرایه JSON از تعریف پرسش‌ها بفرستید. برای توقف /cancel بفرستید.",
    question_delete_confirm: "برای حذف «{question}» عبارت «{keyword}» را بفرستید، یا با /cancel منصرف شوید.",
    question_reset_confirm: "برای کنار گذاشتن فرم سفارشی و بازگشت به پیش‌فرض «{keyword}» را بفرستید، یا با /cancel منصرف شوید.",
    question_saved: "پرسش ذخیره شد.",
    question_deleted: "پرسش حذف شد.",
    question_missing: "این پرسش دیگر وجود ندارد.",
    question_invalid_payload: "این JSON به عنوان تعریف پرسش قابل خواندن نبود. دوباره تلاش کنید یا /cancel بفرستید.",
    question_reset_done: "فرم به پیش‌فرض داخلی بازنشانی شد.",
    question_edit_cancelled: "ویرایش پرسش‌ها لغو شد.",
    question_export_header: "فرم فعلی به صورت JSON:",

    group_help: "دستورات ربات گیلد:\n/myxp - امتیاز و سطح شما\n/xp - جدول امتیاز\n/cups - جام‌های اخیر\n/help - همین پیام",
    group_help_admin: "\nدستورات ادمین:\n/add_cup عنوان|توضیح|نفرات برتر\n/addxp شناسه مقدار\n/panel - پنل مدیریت",
    myxp_summary: "{name}: سطح {level} با {xp} امتیاز ({to_next} امتیاز تا سطح بعد).",
    myxp_none: "هنوز امتیازی برای شما در این گروه ثبت نشده است.",
    xp_leaderboard_header: "جدول امتیاز:",
    xp_leaderboard_empty: "هنوز امتیازی در این گروه ثبت نشده است.",
    cups_header: "جام‌های اخیر:",
    cups_empty: "هنوز جامی در این گروه ثبت نشده است.",
    cup_entry_podium: "نفرات برتر: {podium}",
    add_cup_usage: "نحوه استفاده: /add_cup عنوان|توضیح|نفرات,برتر",
    add_cup_invalid: "جام پذیرفته نشد: عنوان تا ۱۰۰ نویسه، توضیح تا ۳۰۰ نویسه، حداکثر ۱۰ نفر برتر هر کدام تا ۱۰۰ نویسه.",
    cup_added: "جام «{title}» ثبت شد.",
    addxp_usage: "نحوه استفاده: /addxp شناسه مقدار",
    addxp_done: "امتیاز کاربر {user_id} به اندازه {amount} تغییر کرد؛ جمع جدید {total}.",
    level_up: "{name} به سطح {level} رسید!",
    btn_refresh: "به‌روزرسانی",

    panel_admins_only: "پنل گروه مخصوص ادمین‌های گیلد است.",
    panel_title: "پنل مدیریت گروه:",
    panel_closed: "پنل بسته شد.",
    panel_help: "یک بخش را برای مدیریت امتیاز، جام‌ها، ادمین‌ها یا تنظیمات انتخاب کنید. بستن، پیام پنل را حذف می‌کند.",
    btn_panel_xp: "امتیاز",
    btn_panel_cups: "جام‌ها",
    btn_panel_admins: "ادمین‌ها",
    btn_panel_settings: "تنظیمات",
    btn_panel_close: "بستن",
    btn_panel_help: "راهنما",
    btn_panel_back: "بازگشت",
    btn_panel_add_xp: "افزودن امتیاز",
    btn_panel_remove_xp: "کسر امتیاز",
    btn_panel_xp_members: "اعضای دارای امتیاز",
    btn_panel_cups_latest: "جام‌های اخیر",
    btn_panel_cups_help: "راهنمای جام‌ها",
    btn_panel_admins_list: "فهرست ادمین‌ها",
    btn_panel_admins_help: "راهنمای ادمین‌ها",
    btn_panel_settings_tools: "ابزارها",
    btn_panel_settings_help: "درباره تنظیمات",
    panel_menu_xp: "مدیریت امتیاز:",
    panel_menu_cups: "مدیریت جام‌ها:",
    panel_menu_admins: "نمای ادمین‌ها:",
    panel_menu_settings: "تنظیمات گروه:",
    panel_add_xp_prompt: "برای افزودن امتیاز «شناسه مقدار» را بفرستید، یا با «{keyword}» منصرف شوید.",
    panel_remove_xp_prompt: "برای کسر امتیاز «شناسه مقدار» را بفرستید، یا با «{keyword}» منصرف شوید.",
    panel_prompt_cancelled: "باشد، چیزی تغییر نکرد.",
    panel_prompt_invalid: "انتظار «شناسه مقدار» با عدد می‌رفت. دوباره تلاش کنید یا «{keyword}» بفرستید.",
    panel_xp_adjusted: "امتیاز کاربر {user_id} اکنون {total} است.",
    panel_xp_members_header: "اعضای دارای امتیاز ثبت شده:",
    panel_xp_members_empty: "هنوز عضوی ثبت نشده است.",
    panel_cups_hint: "جام‌ها را با /add_cup عنوان|توضیح|نفرات,برتر ثبت کنید.",
    panel_admins_hint: "ادمین‌ها از پنل مدیریت خصوصی ربات مدیریت می‌شوند.",
    panel_settings_tools: "ابزارهای موجود: /addxp و /add_cup و همین پنل.",
    panel_settings_hint: "نرخ امتیاز و زمان‌بندی‌ها در پرونده پیکربندی ربات تنظیم می‌شوند.",

    btn_personal_profile: "نمایه من",
    btn_personal_leaderboard: "جدول امتیاز",
    personal_panel_cooldown: "پنل شما همین الان فرستاده شد. کمی بعد دوباره تلاش کنید.",
    personal_profile_header: "نمایه {name}",
    personal_rank_line: "رتبه {rank} از {count} عضو دارای امتیاز",
    personal_rank_unranked: "هنوز رتبه‌ای ندارید",
    personal_trophies_header: "افتخارات:",
    personal_trophies_none: "هنوز افتخاری ثبت نشده است.",
    personal_leaderboard_header: "برترین اعضا:",

    skip_keyword: "رد",
    cancel_keyword: "لغو",
    confirm_keyword: "تایید",
};
