use rust_dispatcher::config::Settings;
use rust_dispatcher::controller::{ActionTable, Context, Controller};
use rust_dispatcher::error::ActionResult;
use rust_dispatcher::{logger, Server};
use serde_json::json;

/// Sample controller mounted at `/hello`
struct Hello {
    ctx: Context,
}

impl Hello {
    fn index(&mut self) -> ActionResult {
        self.ctx.response.render_string("Hello World");
        Ok(())
    }

    fn say_hello(&mut self) -> ActionResult {
        let name = self.ctx.params.get("name").unwrap_or("stranger").to_string();
        self.ctx.response.render_string(&format!("Hello, {name}!"));
        Ok(())
    }

    // Echo every query parameter back as JSON, wrapped when `callback` is set
    fn echo(&mut self) -> ActionResult {
        let params: serde_json::Map<_, _> = self
            .ctx
            .params
            .iter()
            .filter(|(k, _)| *k != "callback")
            .map(|(k, v)| (k.to_string(), json!(v)))
            .collect();
        let callback = self.ctx.params.get("callback").unwrap_or("").to_string();
        self.ctx.response.render_json_callback(
            &json!({
                "path": self.ctx.request.uri().path(),
                "params": params,
            }),
            &callback,
        )
    }
}

impl Controller for Hello {
    fn from_context(ctx: Context) -> Self {
        Self { ctx }
    }

    fn into_context(self) -> Context {
        self.ctx
    }

    fn actions() -> ActionTable<Self> {
        ActionTable::new()
            .action("IndexAction", Self::index)
            .action("SayHelloAction", Self::say_hello)
            .action("EchoAction", Self::echo)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args().nth(1).unwrap_or_else(|| "config".to_string());
    let settings = Settings::load_from(&config_path)?;
    logger::init(&settings.logging)?;

    // Worker thread count follows `server.workers`, defaulting to CPU cores
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = settings.server.workers {
        runtime_builder.worker_threads(workers);
        println!("[CONFIG] Using {workers} worker threads");
    } else {
        println!("[CONFIG] Using default worker threads (CPU cores)");
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(settings))
}

async fn async_main(settings: Settings) -> Result<(), Box<dyn std::error::Error>> {
    let addr = settings.get_socket_addr()?;

    let mut server = Server::new();
    server
        .set_config(settings.to_config())
        .register_controller::<Hello>("/hello")?
        .register_static_route("/static/", "static");

    server.run(&addr.to_string()).await?;
    Ok(())
}
