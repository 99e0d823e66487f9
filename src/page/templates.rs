pub const PAGE: &str = "page.html";
pub const MENU: &str = "menu.html";

pub const ALL: [(&str, &str); 7] = [
    (PAGE, PAGE_TEMPLATE),
    ("header.html", HEADER_TEMPLATE),
    ("hero.html", HERO_TEMPLATE),
    (MENU, MENU_TEMPLATE),
    ("deals.html", DEALS_TEMPLATE),
    ("footer.html", FOOTER_TEMPLATE),
    ("widget.html", WIDGET_TEMPLATE),
];

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{ menu.restaurant }}</title>
</head>
<body>
{% include "header.html" %}
<main>
{% include "hero.html" %}
{% include "menu.html" %}
{% include "deals.html" %}
</main>
{% include "footer.html" %}
{% include "widget.html" %}
</body>
</html>
"#;

const HEADER_TEMPLATE: &str = r##"<header class="site-header">
  <a class="brand" href="/">{{ menu.restaurant }}</a>
  <nav>
    <a href="#menu">Menu</a>
    <a href="#deals">Deals</a>
  </nav>
</header>"##;

const HERO_TEMPLATE: &str = r#"<section class="hero">
  <h1><span class="gold">Authentic</span> Italian Pizzas<br>Fresh and <span class="red">Delicious</span></h1>
  <p>Made with love, served with pride.</p>
</section>"#;

const MENU_TEMPLATE: &str = r#"<section id="menu">
  <h2>Our Menu</h2>
  <p>Ready to order? Click the voice widget on the bottom right!</p>

  <div class="card">
    <h3>General Information</h3>
    <h4>Hours:</h4><p>{{ menu.info.hours }}</p>
    <h4>Location:</h4><p>{{ menu.info.location }}</p>
    <h4>Menu Summary:</h4><p>{{ menu.info.summary }}</p>
    <h4>Wait Time:</h4><p>{{ menu.info.wait_time }}</p>
  </div>

  <h3>Pizza Sizes &amp; Pricing</h3>
  <table>
    <thead><tr><th>Size</th><th>Diameter</th><th>Price</th></tr></thead>
    <tbody>
    {%- for size in menu.sizes %}
      <tr><td>{{ size.name }}</td><td>{{ size.diameter }}</td><td>{{ size.price|dollars }}</td></tr>
    {%- endfor %}
    </tbody>
  </table>

  <h3>Specialty Pizzas</h3>
  <table>
    <thead><tr><th>Pizza</th><th>Description</th></tr></thead>
    <tbody>
    {%- for pizza in menu.specialty_pizzas %}
      <tr><td>{{ pizza.name }}</td><td>{{ pizza.description }}</td></tr>
    {%- endfor %}
    </tbody>
  </table>

  <h3>Build Your Own Pizza</h3>
  <p><strong>Crust:</strong> Thick or thin crust</p>
  <p><strong>Size:</strong> {% for size in menu.sizes %}{{ size.name }} ({{ size.diameter }}){% if not loop.last %}, {% endif %}{% endfor %}</p>
  <p><strong>Sauce:</strong> Traditional tomato, white garlic, BBQ, or buffalo sauce</p>
  <p><strong>Cheese:</strong> Mozzarella, Extra Cheese, Feta, Cheddar, or Provolone</p>
  <p><strong>Toppings:</strong> You can choose up to {{ included_toppings }} included toppings; additional toppings are {{ extra_topping_fee|dollars }} each</p>

  <h4>Available Toppings:</h4>
  <div class="toppings">
  {%- for category in menu.topping_categories %}
    <div class="card">
      <h5>{{ category.name }}</h5>
      <ul>
      {%- for item in category.items %}
        <li>{{ item }}</li>
      {%- endfor %}
      </ul>
    </div>
  {%- endfor %}
  </div>

  <div class="note">
    <h4>Gluten-Free Option</h4>
    <p>{{ menu.gluten_free_note }}</p>
  </div>

  <h3>Sides, Beverages &amp; Desserts</h3>
  {%- for heading, items in [("Sides", menu.sides), ("Beverages", menu.beverages), ("Desserts", menu.desserts)] %}
  <h4>{{ heading }}</h4>
  <table>
    <thead><tr><th>Item</th><th>Description</th><th>Price</th></tr></thead>
    <tbody>
    {%- for item in items %}
      <tr>
        <td>{{ item.name }}{% if item.quantity %} <small>{{ item.quantity }}</small>{% endif %}</td>
        <td>{{ item.description }}
          {%- for allergen in item.allergens %} <span class="badge">{{ allergen }}</span>{% endfor %}</td>
        <td>{{ item.price|dollars }}</td>
      </tr>
    {%- endfor %}
    </tbody>
  </table>
  {%- endfor %}

  <div class="card">
    <h3>Allergen Information</h3>
    <ul>
    {%- for note in menu.allergen_notes %}
      <li>{{ note }}</li>
    {%- endfor %}
    </ul>
  </div>
</section>"#;

const DEALS_TEMPLATE: &str = r#"<section id="deals">
  <h2>Special Deals</h2>
  <div class="deals">
  {%- for deal in menu.deals %}
    <div class="card deal">
      <img src="{{ deal.image }}" alt="{{ deal.title }}">
      {%- if deal.days %}
      <span class="days">{{ deal.days }}</span>
      {%- endif %}
      <h3>{{ deal.title }}</h3>
      <p>{{ deal.description }}</p>
      <div class="was">{{ deal.original_price|dollars }}</div>
      <div class="now">{{ deal.price|dollars }}</div>
      <span class="save">Save {{ (deal.original_price - deal.price)|dollars }}</span>
    </div>
  {%- endfor %}
  </div>
</section>"#;

const FOOTER_TEMPLATE: &str = r##"<footer>
  <h3>{{ menu.restaurant }}</h3>
  <p>Handcrafted pizzas made with the finest ingredients.</p>
  <p class="legal">&copy; 2025 {{ menu.restaurant }}. All rights reserved.</p>
  <a href="#">Privacy Policy</a>
  <a href="#">Terms of Service</a>
</footer>"##;

// The panel is driven entirely by WidgetView frames from /ws/widget.
const WIDGET_TEMPLATE: &str = r#"<div id="voice-widget">
  <button id="voice-toggle" type="button" aria-label="Voice ordering">Talk to us</button>
  <div id="voice-panel" hidden>
    <div id="voice-status">Idle</div>
    <div id="voice-error" class="error" hidden></div>
    <ol id="voice-chat"></ol>
    <div id="voice-order" hidden>
      <h4>Order Details</h4>
      <p id="voice-order-description"></p>
      <p>Total: <strong id="voice-order-total"></strong></p>
    </div>
    <button id="voice-start" type="button">Start Call</button>
    <button id="voice-end" type="button" hidden>End Call</button>
  </div>
</div>
{% raw %}<script>
(function () {
  const scheme = location.protocol === "https:" ? "wss" : "ws";
  const socket = new WebSocket(scheme + "://" + location.host + "/ws/widget");
  const el = (id) => document.getElementById(id);
  const send = (action) => socket.send(JSON.stringify({ action: action }));

  el("voice-toggle").onclick = () => send("toggle");
  el("voice-start").onclick = () => send("start_call");
  el("voice-end").onclick = () => send("end_call");

  socket.onmessage = (frame) => {
    const view = JSON.parse(frame.data);
    el("voice-panel").hidden = !view.panel_open;
    el("voice-status").textContent = view.status;
    el("voice-error").hidden = !view.error;
    el("voice-error").textContent = view.error || "";
    el("voice-start").hidden = view.call_active;
    el("voice-start").disabled = !view.can_start_call;
    el("voice-end").hidden = !view.call_active;

    const chat = el("voice-chat");
    chat.replaceChildren(...view.chat_log.map((message) => {
      const item = document.createElement("li");
      item.className = message.speaker.toLowerCase();
      item.textContent = message.text;
      return item;
    }));

    el("voice-order").hidden = !view.order;
    if (view.order) {
      el("voice-order-description").textContent = view.order.description;
      el("voice-order-total").textContent = view.order.total;
    }
  };
})();
</script>{% endraw %}"#;
