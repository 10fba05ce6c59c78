use super::{Accent, Entry, Line, RowSchema, Series, SheetSchema, Total};
use super::{
    AI_SHEET, CONTROL_SHEET, FORECAST_SHEET, INFRASTRUCTURE_SHEET, TOKENS_SHEET, TOTALS_SHEET,
    TRAFFIC_SHEET,
};

/// The seven sheets of the cost calculator, in workbook order.
pub fn cost_model() -> Vec<SheetSchema> {
    vec![
        control_panel(),
        ai_generation(),
        infrastructure(),
        traffic(),
        totals_summary(),
        forecast(),
        token_calculator(),
    ]
}

fn control_panel() -> SheetSchema {
    SheetSchema {
        name: CONTROL_SHEET,
        description: "Control panel (input data)",
        title: "CONTROL PANEL - INPUT DATA",
        title_size: 14,
        widths: vec![35.0, 20.0, 10.0, 35.0],
        rows: vec![
            RowSchema::Header(vec!["Parameter", "Value", "Unit", "Comment"]),
            RowSchema::Section("USERS"),
            input("users_base", "Users (month 1)", 5000.0, "users", "MVP launch"),
            input("growth", "User growth", 15.0, "%", "Monthly growth"),
            input("month", "Current calculation month", 1.0, "month", "Change for forecast (1-12)"),
            RowSchema::Blank,
            RowSchema::Section("USAGE PER USER"),
            input("tryons_per_user", "Try-ons per user", 3.0, "pcs", "Pixelcut Try-On"),
            input("videos_per_user", "Animations (video) per user", 1.0, "pcs", "Video generation"),
            input("llm_per_user", "LLM requests per user", 5.0, "pcs", "Chat / recommendations"),
            RowSchema::Blank,
            RowSchema::Section("FILE SIZES"),
            input("photo_mb", "Average photo size", 3.0, "MB", "Input image"),
            input("video_mb", "Average video size", 15.0, "MB", "Generated video"),
            RowSchema::Blank,
            RowSchema::Section("SCALING"),
            input(
                "users_per_server",
                "Users per server",
                10000.0,
                "users",
                "Autoscale threshold",
            ),
            RowSchema::Blank,
            RowSchema::Banner("CALCULATED VALUES"),
            derived(
                "users_now",
                "Users (current month)",
                "=IF({month.B}=1,{users_base.B},ROUND({users_base.B}*(1+{growth.B}/100)^({month.B}-1),0))",
                "users",
                "Including growth",
            ),
            derived(
                "tryons_total",
                "Total try-ons",
                "={users_now.B}*{tryons_per_user.B}",
                "pcs",
                "Per month",
            ),
            derived(
                "videos_total",
                "Total videos",
                "={users_now.B}*{videos_per_user.B}",
                "pcs",
                "Per month",
            ),
            derived(
                "llm_total",
                "Total LLM requests",
                "={users_now.B}*{llm_per_user.B}",
                "pcs",
                "Per month",
            ),
            derived(
                "photo_storage_gb",
                "Photo storage (GB)",
                "={tryons_total.B}*{photo_mb.B}/1024",
                "GB",
                "Per month",
            ),
            derived(
                "video_storage_gb",
                "Video storage (GB)",
                "={videos_total.B}*{video_mb.B}/1024",
                "GB",
                "Per month",
            ),
            derived(
                "servers",
                "Servers required",
                "=CEILING({users_now.B}/{users_per_server.B},1)",
                "pcs",
                "Autoscale",
            ),
        ],
    }
}

fn ai_generation() -> SheetSchema {
    SheetSchema {
        name: AI_SHEET,
        description: "AI costs (Pixelcut, video, LLM)",
        title: "AI AND GENERATION - COSTS",
        title_size: 14,
        widths: vec![35.0, 20.0, 15.0, 15.0, 40.0],
        rows: vec![
            RowSchema::Header(vec![
                "Service / Operation",
                "Price per operation ($)",
                "Quantity",
                "Total ($)",
                "Comment",
            ]),
            RowSchema::Section("VIRTUAL TRY-ONS"),
            priced(
                "tryon",
                "Pixelcut Try-On API",
                0.10,
                "={control-panel!tryons_total.B}",
                "10 credits = $0.10 per image",
            ),
            RowSchema::Blank,
            RowSchema::Section("VIDEO GENERATION"),
            priced(
                "video",
                "Video Animation (MiniMax/Runway)",
                0.50,
                "={control-panel!videos_total.B}",
                "~$0.50 per 5 s of video",
            ),
            RowSchema::Blank,
            RowSchema::Section("LLM / TEXT"),
            priced(
                "gpt4o",
                "OpenAI GPT-4o (1K tokens)",
                0.005,
                "={control-panel!llm_total.B}*2",
                "input+output ~2K tokens per request",
            ),
            priced(
                "gpt4o_mini",
                "OpenAI GPT-4o-mini (backup)",
                0.0003,
                "={control-panel!llm_total.B}*0.5",
                "Lightweight requests",
            ),
            priced(
                "embeddings",
                "Embeddings (search)",
                0.0001,
                "={control-panel!llm_total.B}",
                "Recommendations",
            ),
            RowSchema::Blank,
            RowSchema::Section("ADDITIONAL AI"),
            priced(
                "background_removal",
                "Background Removal",
                0.02,
                "={control-panel!tryons_total.B}*0.5",
                "50% of try-ons",
            ),
            priced(
                "upscale",
                "Image Upscale",
                0.01,
                "={control-panel!tryons_total.B}*0.3",
                "30% of try-ons",
            ),
            RowSchema::Blank,
            RowSchema::Total(Total::new("subtotal", "TOTAL AI AND GENERATION", 3)),
        ],
    }
}

fn infrastructure() -> SheetSchema {
    SheetSchema {
        name: INFRASTRUCTURE_SHEET,
        description: "Servers and infrastructure",
        title: "INFRASTRUCTURE - SERVERS AND SERVICES",
        title_size: 14,
        widths: vec![35.0, 18.0, 15.0, 15.0, 35.0],
        rows: vec![
            RowSchema::Header(vec![
                "Resource",
                "Price per month ($)",
                "Quantity",
                "Total ($)",
                "Provider / Comment",
            ]),
            RowSchema::Section("SERVERS"),
            priced(
                "backend",
                "Backend VPS (4 CPU / 8 GB)",
                45.0,
                "={control-panel!servers.B}",
                "DigitalOcean / Vultr",
            ),
            priced(
                "worker",
                "Worker Server (AI queue)",
                60.0,
                "=CEILING({control-panel!servers.B}/2,1)",
                "Processes background jobs",
            ),
            RowSchema::Blank,
            RowSchema::Section("DATABASES"),
            priced("postgres", "PostgreSQL Managed", 25.0, 1.0, "DigitalOcean / Supabase"),
            priced("redis", "Redis (cache / queues)", 15.0, 1.0, "Upstash / Redis Cloud"),
            RowSchema::Blank,
            RowSchema::Section("STORAGE"),
            priced(
                "object_storage",
                "Object Storage (per GB)",
                0.02,
                "={control-panel!photo_storage_gb.B}+{control-panel!video_storage_gb.B}",
                "S3 / Cloudflare R2",
            ),
            priced(
                "cdn",
                "CDN Bandwidth (per GB)",
                0.01,
                "=({control-panel!photo_storage_gb.B}+{control-panel!video_storage_gb.B})*3",
                "3x storage volume",
            ),
            RowSchema::Blank,
            RowSchema::Section("ADDITIONAL"),
            priced("ssl", "SSL / Domain", 0.0, 1.0, "Let's Encrypt (free)"),
            priced("monitoring", "Monitoring (Sentry)", 26.0, 1.0, "Team plan"),
            priced("ci", "CI/CD (GitHub Actions)", 0.0, 1.0, "Free tier is enough"),
            priced("email", "Email Service (Resend)", 20.0, 1.0, "10K emails per month"),
            RowSchema::Blank,
            RowSchema::Total(Total::new("subtotal", "TOTAL INFRASTRUCTURE", 3)),
        ],
    }
}

fn traffic() -> SheetSchema {
    SheetSchema {
        name: TRAFFIC_SHEET,
        description: "Traffic and communications",
        title: "TRAFFIC AND COMMUNICATIONS",
        title_size: 14,
        widths: vec![35.0, 22.0, 15.0, 15.0, 35.0],
        rows: vec![
            RowSchema::Header(vec![
                "Channel",
                "Price per event ($)",
                "Quantity",
                "Total ($)",
                "Comment",
            ]),
            RowSchema::Section("NOTIFICATIONS"),
            priced(
                "push",
                "Push Notifications",
                0.0001,
                "={control-panel!users_now.B}*10",
                "~10 pushes per user",
            ),
            priced(
                "email_tx",
                "Email (transactional)",
                0.001,
                "={control-panel!users_now.B}*3",
                "~3 emails per user",
            ),
            priced(
                "sms",
                "SMS (critical)",
                0.05,
                "={control-panel!users_now.B}*0.1",
                "10% of users",
            ),
            RowSchema::Blank,
            RowSchema::Section("API AND INTEGRATIONS"),
            priced(
                "webhooks",
                "Webhook calls",
                0.0001,
                "={control-panel!users_now.B}*5",
                "~5 webhooks per user",
            ),
            priced(
                "payments",
                "Payment Gateway (Stripe)",
                0.0,
                1.0,
                "% of transactions billed separately",
            ),
            priced("analytics", "Analytics (Mixpanel)", 0.0, 1.0, "Free tier"),
            RowSchema::Blank,
            RowSchema::Total(Total::new("subtotal", "TOTAL TRAFFIC", 3)),
        ],
    }
}

fn totals_summary() -> SheetSchema {
    let mut grand_total = Total::new("grand_total", "GRAND TOTAL", 1);
    grand_total.extras.push((2, Entry::Text("100%")));
    grand_total.font_size = 12;

    SheetSchema {
        name: TOTALS_SHEET,
        description: "Summary and unit economics",
        title: "COST SUMMARY",
        title_size: 16,
        widths: vec![35.0, 20.0, 15.0, 35.0],
        rows: vec![
            RowSchema::Line(
                Line::new(
                    "period",
                    vec![
                        "Calculation for month:".into(),
                        "={control-panel!month.B}".into(),
                        "Users:".into(),
                        "={control-panel!users_now.B}".into(),
                    ],
                )
                .accent(1, Accent::Input)
                .accent(3, Accent::Computed),
            ),
            RowSchema::Blank,
            RowSchema::Header(vec!["Category", "Amount ($)", "% of total", "Comment"]),
            category(
                "ai",
                "AI and Generation",
                "={AI-generation-costs!subtotal.D}",
                "Pixelcut, Video, LLM",
            ),
            category(
                "infrastructure",
                "Infrastructure",
                "={infrastructure-costs!subtotal.D}",
                "Servers, DB, Storage",
            ),
            category(
                "traffic",
                "Traffic and Communications",
                "={traffic-costs!subtotal.D}",
                "Push, Email, SMS",
            ),
            RowSchema::Blank,
            RowSchema::Total(grand_total),
            RowSchema::Blank,
            RowSchema::Banner("UNIT ECONOMICS"),
            derived(
                "cost_per_user",
                "Cost per user",
                "={grand_total.B}/{control-panel!users_now.B}",
                "$",
                "Monthly average",
            ),
            derived(
                "cost_per_tryon",
                "Cost per try-on",
                "={AI-generation-costs!tryon.D}/{control-panel!tryons_total.B}",
                "$",
                "Pixelcut only",
            ),
            derived(
                "cost_per_video",
                "Cost per video",
                "={AI-generation-costs!video.D}/{control-panel!videos_total.B}",
                "$",
                "Generation only",
            ),
            derived(
                "cost_per_look",
                "Full cost per look",
                "=({AI-generation-costs!tryon.D}+{AI-generation-costs!background_removal.D}+{AI-generation-costs!upscale.D})/{control-panel!tryons_total.B}",
                "$",
                "Try-on + processing",
            ),
        ],
    }
}

fn forecast() -> SheetSchema {
    SheetSchema {
        name: FORECAST_SHEET,
        description: "Six month forecast",
        title: "6-MONTH FORECAST",
        title_size: 16,
        widths: vec![20.0, 14.0, 14.0, 14.0, 14.0, 14.0, 14.0, 12.0],
        rows: vec![
            RowSchema::Header(vec![
                "Metric", "Month 1", "Month 2", "Month 3", "Month 4", "Month 5", "Month 6",
                "Growth",
            ]),
            series(
                "users",
                "Users",
                "={control-panel!users_base.B}",
                "={users.<}*(1+{$control-panel!growth.B}/100)",
            ),
            series(
                "tryons",
                "Try-ons (total)",
                "={users.#}*{$control-panel!tryons_per_user.B}",
                "={users.#}*{$control-panel!tryons_per_user.B}",
            ),
            RowSchema::Blank,
            RowSchema::Section("COSTS ($)"),
            series(
                "ai_cost",
                "AI and Generation",
                AI_COST,
                AI_COST,
            ),
            series(
                "infrastructure_cost",
                "Infrastructure",
                INFRASTRUCTURE_COST,
                INFRASTRUCTURE_COST,
            ),
            series("traffic_cost", "Traffic", TRAFFIC_COST, TRAFFIC_COST),
            RowSchema::Blank,
            RowSchema::Series(Series {
                emphasis: true,
                ..series_row(
                    "monthly_total",
                    "MONTHLY TOTAL",
                    MONTHLY_TOTAL,
                    MONTHLY_TOTAL,
                )
            }),
            RowSchema::Series(Series {
                growth: false,
                emphasis: true,
                ..series_row(
                    "cumulative",
                    "Cumulative",
                    "={monthly_total.#}",
                    "={cumulative.<}+{monthly_total.#}",
                )
            }),
            RowSchema::Blank,
            RowSchema::Section("UNIT ECONOMICS"),
            series(
                "per_user",
                "$ per user",
                "={monthly_total.#}/{users.#}",
                "={monthly_total.#}/{users.#}",
            ),
            series(
                "per_tryon",
                "$ per try-on",
                "={ai_cost.#}/{tryons.#}",
                "={ai_cost.#}/{tryons.#}",
            ),
        ],
    }
}

const AI_COST: &str = "={tryons.#}*{$AI-generation-costs!tryon.B}\
+{users.#}*{$control-panel!videos_per_user.B}*{$AI-generation-costs!video.B}\
+{users.#}*{$control-panel!llm_per_user.B}*{$AI-generation-costs!gpt4o.B}*2";

const INFRASTRUCTURE_COST: &str = "={$infrastructure-costs!backend.B}\
*CEILING({users.#}/{$control-panel!users_per_server.B},1)\
+{$infrastructure-costs!worker.B}\
*CEILING(CEILING({users.#}/{$control-panel!users_per_server.B},1)/2,1)\
+{$infrastructure-costs!postgres.D}+{$infrastructure-costs!redis.D}\
+{$infrastructure-costs!ssl.D}+{$infrastructure-costs!monitoring.D}\
+{$infrastructure-costs!ci.D}+{$infrastructure-costs!email.D}";

const TRAFFIC_COST: &str = "={users.#}*10*{$traffic-costs!push.B}\
+{users.#}*3*{$traffic-costs!email_tx.B}\
+{users.#}*0.1*{$traffic-costs!sms.B}";

const MONTHLY_TOTAL: &str = "={ai_cost.#}+{infrastructure_cost.#}+{traffic_cost.#}";

fn token_calculator() -> SheetSchema {
    SheetSchema {
        name: TOKENS_SHEET,
        description: "LLM token cost calculator",
        title: "TOKEN COST CALCULATOR",
        title_size: 16,
        widths: vec![25.0, 15.0, 15.0, 18.0, 15.0, 15.0],
        rows: vec![
            RowSchema::Header(vec![
                "Provider / Model",
                "Input ($/1M)",
                "Output ($/1M)",
                "Tokens per request",
                "Requests",
                "Total ($)",
            ]),
            RowSchema::Section("OPENAI"),
            chat_model("gpt4o", "GPT-4o", 2.50, 10.00, 2000.0, "={control-panel!llm_total.B}"),
            chat_model(
                "gpt4o_mini",
                "GPT-4o-mini",
                0.15,
                0.60,
                1500.0,
                "={control-panel!llm_total.B}*0.5",
            ),
            chat_model("gpt4_turbo", "GPT-4-turbo", 10.00, 30.00, 2000.0, 0.0),
            RowSchema::Blank,
            RowSchema::Section("ANTHROPIC"),
            chat_model("claude_sonnet", "Claude 3.5 Sonnet", 3.00, 15.00, 2000.0, 0.0),
            chat_model("claude_haiku", "Claude 3 Haiku", 0.25, 1.25, 1500.0, 0.0),
            RowSchema::Blank,
            RowSchema::Section("GOOGLE"),
            chat_model("gemini_pro", "Gemini 1.5 Pro", 1.25, 5.00, 2000.0, 0.0),
            chat_model("gemini_flash", "Gemini 1.5 Flash", 0.075, 0.30, 1500.0, 0.0),
            RowSchema::Blank,
            RowSchema::Section("EMBEDDINGS"),
            embedding_model(
                "embedding_small",
                "text-embedding-3-small",
                0.02,
                500.0,
                "={control-panel!llm_total.B}",
            ),
            embedding_model("embedding_large", "text-embedding-3-large", 0.13, 500.0, 0.0),
            RowSchema::Blank,
            RowSchema::Total(Total::new("subtotal", "TOTAL LLM COSTS", 5)),
            RowSchema::Blank,
            RowSchema::Note("NOTE: 1M = 1,000,000 tokens. ~750 words = ~1000 tokens"),
        ],
    }
}

fn input(
    key: &'static str,
    label: &'static str,
    value: f64,
    unit: &'static str,
    comment: &'static str,
) -> RowSchema {
    let cells = vec![label.into(), value.into(), unit.into(), comment.into()];
    RowSchema::Line(Line::new(key, cells).accent(1, Accent::Input))
}

fn derived(
    key: &'static str,
    label: &'static str,
    formula: &'static str,
    unit: &'static str,
    comment: &'static str,
) -> RowSchema {
    let cells = vec![label.into(), formula.into(), unit.into(), comment.into()];
    RowSchema::Line(Line::new(key, cells).accent(1, Accent::Computed))
}

fn priced(
    key: &'static str,
    label: &'static str,
    price: f64,
    quantity: impl Into<Entry>,
    comment: &'static str,
) -> RowSchema {
    let cells = vec![
        label.into(),
        price.into(),
        quantity.into(),
        "={@.B}*{@.C}".into(),
        comment.into(),
    ];
    RowSchema::Line(Line::new(key, cells))
}

fn category(
    key: &'static str,
    label: &'static str,
    subtotal: &'static str,
    comment: &'static str,
) -> RowSchema {
    let cells = vec![
        label.into(),
        subtotal.into(),
        "={@.B}/{$grand_total.B}*100".into(),
        comment.into(),
    ];
    RowSchema::Line(Line::new(key, cells))
}

fn chat_model(
    key: &'static str,
    label: &'static str,
    input_price: f64,
    output_price: f64,
    tokens: f64,
    requests: impl Into<Entry>,
) -> RowSchema {
    let cells = vec![
        label.into(),
        input_price.into(),
        output_price.into(),
        tokens.into(),
        requests.into(),
        "=({@.B}*{@.D}/1000000+{@.C}*{@.D}/1000000)*{@.E}".into(),
    ];
    RowSchema::Line(Line::new(key, cells))
}

fn embedding_model(
    key: &'static str,
    label: &'static str,
    input_price: f64,
    tokens: f64,
    requests: impl Into<Entry>,
) -> RowSchema {
    let cells = vec![
        label.into(),
        input_price.into(),
        Entry::Number(0.0),
        tokens.into(),
        requests.into(),
        "={@.B}*{@.D}/1000000*{@.E}".into(),
    ];
    RowSchema::Line(Line::new(key, cells))
}

fn series(
    key: &'static str,
    label: &'static str,
    first: &'static str,
    rest: &'static str,
) -> RowSchema {
    RowSchema::Series(series_row(key, label, first, rest))
}

fn series_row(
    key: &'static str,
    label: &'static str,
    first: &'static str,
    rest: &'static str,
) -> Series {
    Series {
        key,
        label,
        first,
        rest,
        growth: true,
        emphasis: false,
    }
}
