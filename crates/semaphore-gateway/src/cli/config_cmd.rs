use semaphore_gateway::GatewayConfig;
use semaphore_types::GatewayResult;

pub fn show_config(config: &GatewayConfig) -> GatewayResult<()> {
    println!("{}", config.redacted());
    match config.validate() {
        Ok(()) => {
            println!("\x1b[38;5;46mConfiguration is valid\x1b[0m");
            Ok(())
        }
        Err(e) => {
            println!("\x1b[38;5;196mConfiguration is invalid:\x1b[0m {}", e);
            Err(e)
        }
    }
}
