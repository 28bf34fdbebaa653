use anyhow::{anyhow, Result};
use colored::*;
use reqwest::{Client, Method};
use serde_json::{json, Value};
use std::io::{self, Write};

#[tokio::main]
async fn main() -> Result<()> {
    println!("{}", "🅿️ Parking Ledger Testing Tool".bright_blue().bold());
    println!("{}", "=====================================".bright_blue());
    println!();

    let base_url = std::env::var("PARKING_API_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
    let api = Api {
        client: Client::new(),
        base_url,
    };

    // Paso 1: login contra el servicio
    login(&api).await?;

    // Paso 2: menú principal
    loop {
        println!();
        println!("{}", "📋 MENÚ PRINCIPAL".bright_green().bold());
        println!("{}", "==================".bright_green());
        println!("1. 📄 Ver ledgers");
        println!("2. ➕ Registrar vehículo");
        println!("3. 💳 Alternar pago");
        println!("4. 🗑️  Eliminar vehículo");
        println!("5. 🔍 Buscar");
        println!("6. 💰 Totales");
        println!("7. ⏰ Revisar pendientes");
        println!("8. 🧹 Vaciar todo");
        println!("9. 🚪 Salir");
        let choice = prompt("Selecciona una opción (1-9): ")?;

        let result = match choice.as_str() {
            "1" => show_ledgers(&api).await,
            "2" => add_vehicle(&api).await,
            "3" => vehicle_action(&api, Method::PUT, "/toggle").await,
            "4" => vehicle_action(&api, Method::DELETE, "").await,
            "5" => search(&api).await,
            "6" => print_json(&api, Method::GET, "/api/vehicles/totals", None).await,
            "7" => print_json(&api, Method::POST, "/api/vehicles/stale-check", None).await,
            "8" => clear_all(&api).await,
            "9" => {
                api.request(Method::POST, "/api/auth/logout", None).await?;
                println!("{}", "👋 ¡Hasta luego!".bright_green());
                break;
            }
            _ => {
                println!("{}", "❌ Opción inválida. Intenta de nuevo.".bright_red());
                Ok(())
            }
        };

        if let Err(e) = result {
            println!("{} {}", "❌ Error:".bright_red(), e);
        }

        show_notifications(&api).await?;
    }

    Ok(())
}

struct Api {
    client: Client,
    base_url: String,
}

impl Api {
    async fn request(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.client.request(method, &url);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        let body: Value = response.json().await.unwrap_or(Value::Null);

        if !status.is_success() {
            let message = body["message"].as_str().unwrap_or("sin detalle");
            return Err(anyhow!("{} - {}", status, message));
        }
        Ok(body)
    }
}

fn prompt(label: &str) -> Result<String> {
    print!("{}", label.bright_yellow());
    io::stdout().flush()?;
    let mut value = String::new();
    io::stdin().read_line(&mut value)?;
    Ok(value.trim().to_string())
}

fn prompt_category() -> Result<&'static str> {
    match prompt("Categoría (c = coche, m = moto): ")?.as_str() {
        "m" | "moto" | "motorcycle" => Ok("motorcycle"),
        _ => Ok("car"),
    }
}

async fn login(api: &Api) -> Result<()> {
    println!("{}", "🔐 LOGIN".bright_cyan().bold());
    println!("{}", "========".bright_cyan());

    loop {
        let email = prompt("Email: ")?;
        let password = prompt("Password: ")?;

        let body = api
            .request(Method::POST, "/api/auth/login", Some(json!({ "email": email, "password": password })))
            .await?;

        if body["success"].as_bool().unwrap_or(false) {
            println!("{} {}", "✅ Bienvenido,".bright_green(), body["name"].as_str().unwrap_or(""));
            return Ok(());
        }
        println!("{}", body["message"].as_str().unwrap_or("Login inválido").bright_red());
    }
}

async fn show_ledgers(api: &Api) -> Result<()> {
    let body = api.request(Method::GET, "/api/vehicles", None).await?;
    for (title, key) in [("🚗 Coches", "cars"), ("🏍️  Motos", "motorcycles")] {
        println!();
        println!("{}", title.bright_blue().bold());
        let entries = body[key].as_array().cloned().unwrap_or_default();
        if entries.is_empty() {
            println!("   (vacío)");
        }
        for entry in entries {
            let status = if entry["paid"].as_bool().unwrap_or(false) {
                "PAGADO".bright_green()
            } else {
                "PENDIENTE".bright_yellow()
            };
            println!(
                "   #{} {} {} {} [{}] {}",
                entry["id"],
                entry["plate"].as_str().unwrap_or(""),
                entry["model"].as_str().unwrap_or(""),
                entry["color"].as_str().unwrap_or(""),
                status,
                entry["amount"].as_str().unwrap_or("0")
            );
        }
    }
    Ok(())
}

async fn add_vehicle(api: &Api) -> Result<()> {
    let category = prompt_category()?;
    let plate = prompt("Placa: ")?;
    let model = prompt("Modelo: ")?;
    let color = prompt("Color (opcional): ")?;

    let path = format!("/api/vehicles/{}", category);
    print_json(api, Method::POST, &path, Some(json!({ "plate": plate, "model": model, "color": color }))).await
}

async fn vehicle_action(api: &Api, method: Method, suffix: &str) -> Result<()> {
    let category = prompt_category()?;
    let id = prompt("Id: ")?;
    let path = format!("/api/vehicles/{}/{}{}", category, id, suffix);
    print_json(api, method, &path, None).await
}

async fn search(api: &Api) -> Result<()> {
    let term = prompt("Término: ")?;
    let path = format!("/api/vehicles/search?term={}", term.replace(' ', "%20"));
    print_json(api, Method::GET, &path, None).await
}

async fn clear_all(api: &Api) -> Result<()> {
    let answer = prompt("¿Eliminar TODOS los vehículos? (s/N): ")?;
    if !answer.eq_ignore_ascii_case("s") {
        println!("{}", "Operación cancelada".bright_yellow());
        return Ok(());
    }
    print_json(api, Method::DELETE, "/api/vehicles", Some(json!({ "confirm": true }))).await
}

async fn print_json(api: &Api, method: Method, path: &str, body: Option<Value>) -> Result<()> {
    let response = api.request(method, path, body).await?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

async fn show_notifications(api: &Api) -> Result<()> {
    let body = api.request(Method::GET, "/api/notifications", None).await?;
    for notification in body.as_array().cloned().unwrap_or_default() {
        let message = notification["message"].as_str().unwrap_or("");
        let line = match notification["kind"].as_str() {
            Some("warning") => format!("⚠️  {}", message).bright_yellow(),
            Some("success") => format!("✅ {}", message).bright_green(),
            _ => format!("ℹ️  {}", message).bright_blue(),
        };
        println!("{}", line);
    }
    Ok(())
}
